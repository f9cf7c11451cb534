use thiserror::Error as ThisError;
use uniffi::Error;

use crate::error::ForgeError;

/// Error surfaced to the mobile shell. Only the message crosses the boundary.
#[derive(Debug, ThisError, Error)]
#[uniffi(flat_error)]
pub enum ForgeFfiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    DuplicateName(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    NoDaysAvailable(String),
    #[error("{0}")]
    FeedbackPending(String),
    #[error("{0}")]
    SubmissionPending(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Backend(String),
}

impl From<ForgeError> for ForgeFfiError {
    fn from(e: ForgeError) -> Self {
        let message = e.to_string();
        match e {
            ForgeError::Validation(_) => ForgeFfiError::Validation(message),
            ForgeError::InvalidInput(_) => ForgeFfiError::InvalidInput(message),
            ForgeError::DuplicateName(_) => ForgeFfiError::DuplicateName(message),
            ForgeError::NotFound { .. } => ForgeFfiError::NotFound(message),
            ForgeError::NoDaysAvailable => ForgeFfiError::NoDaysAvailable(message),
            ForgeError::FeedbackPending(_) => ForgeFfiError::FeedbackPending(message),
            ForgeError::SubmissionPending => ForgeFfiError::SubmissionPending(message),
            ForgeError::Forbidden(_) => ForgeFfiError::Forbidden(message),
            ForgeError::Unauthorized => ForgeFfiError::Unauthorized(message),
            _ => ForgeFfiError::Backend(message),
        }
    }
}

impl ForgeFfiError {
    pub fn invalid<D: std::fmt::Display>(d: D) -> Self {
        ForgeFfiError::InvalidInput(d.to_string())
    }
}
