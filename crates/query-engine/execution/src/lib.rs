//! Query execution against a SQL database.

pub mod error;
pub mod metrics;
pub mod query;
pub mod rows;
