/// Why a single storage call failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureReason {
    /// The network answered with a non-success status
    #[error("http status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("not found")]
    NotFound,
    #[error("timed out")]
    Timeout,
    /// The request never got a response
    #[error("network error: {0}")]
    Network(String),
    #[error("{0}")]
    UnexpectedResponse(String),
    /// The store itself is broken, independent of any network
    #[error("internal store error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("storage write failed: {0}")]
    Write(FailureReason),
    #[error("storage read failed: {0}")]
    Read(FailureReason),
    #[error("invalid content address: {0:?}")]
    InvalidAddress(String),
}

impl StoreError {
    pub fn reason(&self) -> Option<&FailureReason> {
        match self {
            Self::Write(reason) | Self::Read(reason) => Some(reason),
            Self::InvalidAddress(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.reason(), Some(FailureReason::NotFound))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.reason(), Some(FailureReason::Timeout))
    }
}
