// Error types shared by every remote call

/// Failure talking to the hosted table backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend rejected request: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid backend response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        BackendError::Network(e.to_string())
    }
}
