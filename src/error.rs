use std::time::Duration;

use thiserror::Error;

/// Errors raised while talking to the backing database
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The pool could not be opened or a connection could not be acquired
    #[error("Connection error: {0}")]
    Connection(String),

    /// The database rejected or failed to run a statement
    #[error("Query error: {0}")]
    Query(String),

    /// A statement did not complete within the configured timeout
    #[error("Query timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// A row could not be decoded into the expected column types.
    /// `column` is the index or name the driver reported.
    #[error("Row decode error at column {column}: {message}")]
    RowDecode { column: String, message: String },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { index, source } => StoreError::RowDecode {
                column: index.trim_matches('"').to_string(),
                message: source.to_string(),
            },
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => StoreError::RowDecode {
                column: index.to_string(),
                message: format!("row has only {} columns", len),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Connection(err.to_string())
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Errors caused by malformed request parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// A numeric query parameter contained something other than ASCII digits
    #[error("Invalid value for '{param}': expected a non-negative integer, got '{value}'")]
    NotAnInteger { param: &'static str, value: String },

    /// A page size of zero was requested
    #[error("Invalid value for '{param}': must be at least 1")]
    ZeroLimit { param: &'static str },

    /// The query string could not be decoded at all
    #[error("Malformed query string: {0}")]
    MalformedQuery(String),
}
