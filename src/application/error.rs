//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("permission denied: cannot view {0}")]
    PermissionDenied(String),

    #[error("nothing to export: {0}")]
    NothingToExport(String),

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    /// Form field a validation error belongs to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ApplicationError::Domain(e) => e.field(),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
