//! Handle the page window translation.

use query_engine_sql::sql;

/// Translate the page window into the `{{PAGING}}` fragment. Both the offset and
/// a bounded limit are required, anything else leaves the fragment empty.
pub(crate) fn translate_page(page: &sql::ast::PageWindow) -> sql::string::SQL {
    let mut paging = sql::string::SQL::new();
    page.to_sql(&mut paging);
    paging
}
