//! SQL types and rendering for templated grid queries.

pub mod sql;
