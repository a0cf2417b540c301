//! Errors surfaced to the grid.

use query_engine_execution::error as execution;
use query_engine_translation::translation::error as translation;

/// A grid query could not be served.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The query could not be resolved. Nothing was sent to the database.
    #[error("{0}")]
    Translation(#[from] translation::Error),
    #[error("{0}")]
    Execution(#[from] execution::Error),
}

impl Error {
    /// Whether the failure happened before the database was reached.
    pub fn is_translation_error(&self) -> bool {
        matches!(self, Error::Translation(_))
    }
}
