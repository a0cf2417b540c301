//! Metadata information regarding the holder type that fetched rows are mapped into.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use query_engine_sql::sql::ast::FieldName;

/// The declared shape of a holder: its name and the fields it is built from.
///
/// Each field must appear as a result column alias of the template, with exactly
/// the same name. Filters and sort orders may only refer to these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HolderInfo {
    pub name: String,
    pub fields: Vec<FieldName>,
    pub description: Option<String>,
}

impl HolderInfo {
    pub fn new<F: Into<FieldName>>(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = F>,
    ) -> Self {
        HolderInfo {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            description: None,
        }
    }

    pub fn has_field(&self, field: &FieldName) -> bool {
        self.fields.contains(field)
    }
}
