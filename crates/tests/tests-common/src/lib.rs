//! Shared fixtures for the integration tests of the workspace.

pub mod database;
pub mod predicate;
pub mod recording;
