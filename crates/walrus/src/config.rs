use std::time::Duration;

pub const DEFAULT_PUBLISHER_URL: &str = "https://publisher.walrus-testnet.walrus.space";
pub const DEFAULT_AGGREGATOR_URL: &str = "https://aggregator.walrus-testnet.walrus.space";
/// Storage epochs requested for every write
pub const DEFAULT_EPOCHS: u32 = 100;

/// Endpoints and request options for a [`WalrusClient`](crate::WalrusClient)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalrusConfig {
    pub publisher_url: String,
    pub aggregator_url: String,
    pub epochs: u32,
    /// Applied to each request as a whole. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl WalrusConfig {
    pub fn new(publisher_url: impl Into<String>, aggregator_url: impl Into<String>) -> Self {
        Self {
            publisher_url: publisher_url.into(),
            aggregator_url: aggregator_url.into(),
            ..Self::default()
        }
    }

    pub fn with_epochs(mut self, epochs: u32) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for WalrusConfig {
    fn default() -> Self {
        Self {
            publisher_url: DEFAULT_PUBLISHER_URL.to_string(),
            aggregator_url: DEFAULT_AGGREGATOR_URL.to_string(),
            epochs: DEFAULT_EPOCHS,
            timeout: None,
        }
    }
}
