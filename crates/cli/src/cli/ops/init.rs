use clap::Args;
use common::crypto::PlaintextPolicy;
use walrus::{WalrusClient, WalrusError};

use crate::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Walrus publisher URL used for uploads
    #[arg(long)]
    pub publisher_url: Option<String>,

    /// Walrus aggregator URL used for reads
    #[arg(long)]
    pub aggregator_url: Option<String>,

    /// Storage epochs requested per upload
    #[arg(long)]
    pub epochs: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Fail on input without the envelope marker instead of passing it through
    #[arg(long)]
    pub reject_plaintext: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("invalid storage configuration: {0}")]
    Walrus(#[from] WalrusError),
}

impl Init {
    fn config(&self) -> AppConfig {
        let defaults = AppConfig::default();
        AppConfig {
            publisher_url: self
                .publisher_url
                .clone()
                .unwrap_or(defaults.publisher_url),
            aggregator_url: self
                .aggregator_url
                .clone()
                .unwrap_or(defaults.aggregator_url),
            epochs: self.epochs.unwrap_or(defaults.epochs),
            timeout_secs: self.timeout_secs,
            plaintext: if self.reject_plaintext {
                PlaintextPolicy::Reject
            } else {
                PlaintextPolicy::Passthrough
            },
        }
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = self.config();
        // reject unusable URLs before anything is written
        WalrusClient::new(&config.walrus_config())?;

        let (state, identity) = AppState::init(ctx.config_path.clone(), Some(config))?;

        Ok(format!(
            "Initialized blobseal directory at {}\nConfig: {}\nKey: {}\nPublic key: {}",
            state.app_dir.display(),
            state.config_path.display(),
            state.key_path.display(),
            identity.public_key.to_jwk_string()
        ))
    }
}
