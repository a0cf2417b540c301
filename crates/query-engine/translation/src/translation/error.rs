//! Errors for query translation.

use thiserror::Error;

use query_engine_metadata::metadata::StaticParameters;
use query_engine_sql::sql::ast::{FieldName, Filter, ParamName, Value};

/// A type for translation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("{0}")]
    ParameterCollision(Box<ParameterCollision>),
    #[error("Field '{field}' not found in holder '{holder}'.")]
    FieldNotFound { field: FieldName, holder: String },
}

/// A filter produced a parameter whose name is already bound by the static parameters.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "Parameter ':{name}' with value {value} produced by filter {filter} is already bound. \
     Query template: {template}, static parameters: {parameters}."
)]
pub struct ParameterCollision {
    pub name: ParamName,
    pub value: Value,
    pub filter: Filter,
    pub template: String,
    pub parameters: StaticParameters,
}

impl From<ParameterCollision> for Error {
    fn from(value: ParameterCollision) -> Self {
        Error::ParameterCollision(Box::new(value))
    }
}
