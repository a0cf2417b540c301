//! Describe the execution plan of a resolved grid query.

use std::marker::PhantomData;

use super::string::SQL;

/// A resolved query, tagged with the kind of result it produces.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPlan<Kind> {
    /// The collection or template the query was resolved from. For logging.
    pub root_field: String,
    pub query: SQL,
    kind: PhantomData<Kind>,
}

/// A query producing a single row with a single count column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Count;

/// A query producing holder rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fetch;

impl<Kind> ExecutionPlan<Kind> {
    pub fn new(root_field: impl Into<String>, query: SQL) -> Self {
        ExecutionPlan {
            root_field: root_field.into(),
            query,
            kind: PhantomData,
        }
    }

    /// Extract the query component as SQL.
    pub fn query_sql(&self) -> &SQL {
        &self.query
    }

    /// The query text, formatted for humans.
    pub fn explain(&self) -> String {
        sqlformat::format(
            &self.query.sql,
            &sqlformat::QueryParams::None,
            sqlformat::FormatOptions::default(),
        )
    }
}
