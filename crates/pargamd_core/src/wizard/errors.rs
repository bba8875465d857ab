//! Error types for wizard operations.
//!
//! Every error here is also surfaced to the user as an error notification;
//! the `Result` return lets callers react programmatically.

use thiserror::Error;

use crate::backend::{BackendError, DownloadError};

#[derive(Error, Debug)]
pub enum WizardError {
    /// Local validation failed; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// The backend rejected the request or could not be reached.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The downloaded bundle could not be saved.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The action exists but is turned off in this build.
    #[error("{0}")]
    Disabled(String),
}

impl WizardError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type WizardResult<T> = Result<T, WizardError>;
