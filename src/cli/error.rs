//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Csv(_) => crate::exitcode::CANTCREAT,
                InfraError::ForestFile { .. } => crate::exitcode::DATAERR,
                InfraError::Application(e) => application_exit_code(e),
            },
        }
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::PermissionDenied(_) => crate::exitcode::NOPERM,
        ApplicationError::Config { .. } => crate::exitcode::CONFIG,
        ApplicationError::NothingToExport(_) => crate::exitcode::DATAERR,
        ApplicationError::Domain(domain) => match domain {
            DomainError::InvalidSelection { .. } | DomainError::ColumnIndexOutOfRange { .. } => {
                crate::exitcode::USAGE
            }
            DomainError::Internal(_) => crate::exitcode::SOFTWARE,
            _ => crate::exitcode::DATAERR,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_unknown_group_when_mapped_then_usage_exit_code() {
        let err = CliError::from(InfraError::from(ApplicationError::from(
            DomainError::invalid_selection("column_groups", "unknown column group: x"),
        )));
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }

    #[test]
    fn given_permission_denied_when_mapped_then_noperm_exit_code() {
        let err = CliError::from(InfraError::from(ApplicationError::PermissionDenied(
            "08B-410".to_string(),
        )));
        assert_eq!(err.exit_code(), crate::exitcode::NOPERM);
    }
}
