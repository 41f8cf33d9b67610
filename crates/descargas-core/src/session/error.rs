//! Submission failures as the user sees them.

use crate::api::ApiError;
use crate::form::FormError;

/// Message for any rejected or unreadable creation response.
pub const SUBMIT_FAILED_MESSAGE: &str = "Error iniciando descarga";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The form did not pass validation; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] FormError),
    /// Non-2xx status, undecodable body or missing task id.
    #[error("{}", SUBMIT_FAILED_MESSAGE)]
    Rejected,
    /// Network-level failure; carries the transport's message.
    #[error("{0}")]
    Network(String),
}

impl From<ApiError> for SubmitError {
    fn from(e: ApiError) -> Self {
        if e.is_transport() {
            SubmitError::Network(e.to_string())
        } else {
            tracing::debug!("task creation failed: {}", e);
            SubmitError::Rejected
        }
    }
}
