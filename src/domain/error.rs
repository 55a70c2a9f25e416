//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the export core's contracts.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node appears twice in row {row}: {name}")]
    DuplicateNode { row: usize, name: String },

    #[error("node {name} is a row root in one row and nested in another (row {row})")]
    InconsistentNesting { row: usize, name: String },

    #[error("column index {index} out of range ({len} columns)")]
    ColumnIndexOutOfRange { index: usize, len: usize },

    #[error("label column has {labels} entries but the table has {rows} rows")]
    LabelCountMismatch { labels: usize, rows: usize },

    #[error("invalid selection in field '{field}': {message}")]
    InvalidSelection { field: String, message: String },

    #[error("forest has no root node")]
    EmptyForest,

    #[error("internal column layout inconsistency: {0}")]
    Internal(String),
}

impl DomainError {
    /// Validation error localized to one form field.
    pub fn invalid_selection(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelection {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the form field this error belongs to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidSelection { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
