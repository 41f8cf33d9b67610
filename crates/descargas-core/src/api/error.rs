//! Error type for task API calls.

/// Failure of a single request against the backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Curl reported an error (connection refused, DNS, timeout, ...).
    #[error("{0}")]
    Transport(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Status(u32),
    /// Response body was not the expected JSON.
    #[error("{0}")]
    Body(#[from] serde_json::Error),
    /// Creation response had no usable task id.
    #[error("response did not contain a task id")]
    MissingId,
    /// Base URL or task path could not be turned into a request URL.
    #[error("invalid URL: {0}")]
    Url(String),
}

impl ApiError {
    /// True for network-level failures, whose own message is shown to the user.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        ApiError::Url(e.to_string())
    }
}
