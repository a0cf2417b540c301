//! A data provider that serves a grid's row count and pages of rows from a hand-written SQL
//! query template.

pub mod error;
pub mod health;
pub mod provider;
pub mod state;

pub use error::Error;
pub use provider::{DataProvider, SqlDataProvider};

pub use query_engine_execution::rows::{MappedRows, Row, RowMappingError};
pub use query_engine_metadata::metadata::{HolderInfo, QueryTemplate, StaticParameters};
pub use query_engine_sql::sql::ast::{
    ComparisonOperator, Filter, OrderByDirection, OrderByElement, PageWindow, RowLimit, Value,
};
pub use query_engine_translation::translation::request::GridQuery;
