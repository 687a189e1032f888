//! Error taxonomy for the leads client
//!
//! Every outcome is classified and returned to the caller; nothing here is
//! retried or swallowed.

use thiserror::Error;

/// Failures of the local session storage (sled).
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("session storage holds invalid UTF-8 under key '{0}'")]
    Corrupt(&'static str),
}

/// Errors produced while building configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Outcome classes of every request-issuing operation.
#[derive(Error, Debug)]
pub enum LeadsError {
    /// Local input check failed; no request was issued.
    #[error("invalid value for field '{field}'")]
    Validation { field: &'static str },

    /// Credentials are absent, locally expired, or rejected by the backend.
    #[error("session expired, please login again")]
    SessionExpired,

    /// Transport failure, no response received.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A response arrived with a non-success status. `message` is the
    /// backend's own text when it sent one.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl LeadsError {
    pub fn validation(field: &'static str) -> Self {
        LeadsError::Validation { field }
    }

    /// Field name for validation failures.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            LeadsError::Validation { field } => Some(field),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, LeadsError>;
