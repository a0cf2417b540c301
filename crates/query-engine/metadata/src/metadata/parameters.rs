//! Parameters bound by the caller, referenced directly in the query template.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use query_engine_sql::sql::ast::{ParamName, Value};

/// Named values referenced as `:name` in the template, outside the placeholders.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct StaticParameters(pub IndexMap<ParamName, Value>);

impl StaticParameters {
    pub fn empty() -> Self {
        StaticParameters(IndexMap::new())
    }

    pub fn get(&self, name: &ParamName) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &ParamName) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParamName, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<ParamName>, V: Into<Value>> FromIterator<(N, V)> for StaticParameters {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        StaticParameters(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl std::fmt::Display for StaticParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{{")?;
        for (index, (name, value)) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}
