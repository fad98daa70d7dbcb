//! Error types for sqlweave

use thiserror::Error;

/// Result type alias for sqlweave operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for building and running statements
#[derive(Debug, Error)]
pub enum OrmError {
    /// Query execution error
    #[cfg(feature = "postgres")]
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// A single-row read found no rows
    #[error("Not found: {0}")]
    NotFound(String),

    /// Tried to run a template with no SQL text
    #[error("Empty template: nothing to execute")]
    EmptyTemplate,

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error (placeholder parity, builder misuse, unsafe mutations)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Two fields of one record resolve to the same column name
    #[error("Ambiguous column '{column}' in record {record}")]
    AmbiguousColumn { record: String, column: String },

    /// Strict catalog mode: a field has no storage type
    #[error("Unresolved storage type for field {record}.{field}")]
    UnresolvedType { record: String, field: String },

    /// No dialect registered under the requested name
    #[error("Dialect not found: {0:?}")]
    DialectNotFound(String),

    /// Query timeout error
    #[error("Query timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// Executor error from a non-postgres backend
    #[error("Executor error: {0}")]
    Executor(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is an empty template error
    pub fn is_empty_template(&self) -> bool {
        matches!(self, Self::EmptyTemplate)
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
