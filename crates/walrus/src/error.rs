/// Failure to construct a client
///
/// Failures of individual calls are reported as
/// [`common::store::StoreError`] instead.
#[derive(Debug, thiserror::Error)]
pub enum WalrusError {
    #[error("HTTP client setup failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("not a base URL: {0}")]
    NotABaseUrl(String),
}
