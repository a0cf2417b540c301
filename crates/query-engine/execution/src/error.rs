//! Errors for query execution.

use query_engine_sql::sql::string::PositionalError;

/// Query execution error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Query(#[from] QueryError),
    /// Failures raised by the database driver, passed through untouched.
    #[error(transparent)]
    DB(#[from] sqlx::Error),
}

/// Errors in the query itself, found before or after talking to the database.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("{0}")]
    Bind(#[from] PositionalError),
    #[error("count query returned a negative count: {0}")]
    NegativeCount(i64),
}
