//! The query a grid issues each time it needs a row count or a page of rows.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use query_engine_sql::sql::ast::{Filter, OrderBy, OrderByElement, PageWindow};

/// Filter, sort orders and page window of a single grid request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GridQuery {
    #[serde(default)]
    pub filter: Option<Filter>,
    #[serde(default)]
    pub order_by: OrderBy,
    #[serde(default, flatten)]
    pub page: PageWindow,
}

impl GridQuery {
    pub fn new() -> Self {
        GridQuery::default()
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn with_order_by(mut self, elements: Vec<OrderByElement>) -> Self {
        self.order_by = OrderBy { elements };
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: PageWindow) -> Self {
        self.page = page;
        self
    }
}
