//! Error model for ERP data access.

use thiserror::Error;

/// Result type used across the ERP access crates.
pub type ErpResult<T> = Result<T, ErpError>;

/// ERP access error.
///
/// `NotFound` and `Consistency` are the two business-level outcomes callers are
/// expected to distinguish. Consistency failures are never downgraded to defaults:
/// a processing error is preferred over silently wrong output.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErpError {
    /// The requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// ERP data violates an invariant (duplicates, corruption flag, missing date, ...).
    #[error("data consistency violated: {0}")]
    Consistency(String),

    /// An identifier was malformed (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A result row lacks a column the mapping requires.
    #[error("row from {table} lacks required field `{field}`")]
    MissingField { table: String, field: String },

    /// A result row carries a column of an unexpected type.
    #[error("field `{field}` is not {expected}")]
    FieldType { field: String, expected: &'static str },

    /// The external query layer reported a failure.
    #[error("backend failure: {0}")]
    Backend(String),

    /// Configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ErpError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn consistency(msg: impl Into<String>) -> Self {
        Self::Consistency(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn missing_field(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            table: table.into(),
            field: field.into(),
        }
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error is a data consistency violation.
    pub fn is_consistency(&self) -> bool {
        matches!(self, Self::Consistency(_))
    }

    /// Whether this error reports a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
