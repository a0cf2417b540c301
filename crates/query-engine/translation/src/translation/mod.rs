//! Translate an incoming grid query to an ExecutionPlan (SQL) to be run against the database.

pub mod error;
pub mod query;
pub mod request;
