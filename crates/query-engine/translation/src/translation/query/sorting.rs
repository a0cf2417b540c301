//! Handle sort orders translation.

use query_engine_metadata::metadata::HolderInfo;
use query_engine_sql::sql;

use super::filtering::check_fields;
use crate::translation::error::Error;

/// Translate the grid's sort orders into the `{{ORDER}}` fragment: `, <entries>`,
/// or nothing at all when there are none.
pub(crate) fn translate_order_by(
    holder: &HolderInfo,
    order_by: &sql::ast::OrderBy,
) -> Result<sql::string::SQL, Error> {
    check_fields(holder, order_by.elements.iter().map(|element| &element.field))?;

    let mut entries = sql::string::SQL::new();
    order_by.to_sql(&mut entries);

    Ok(sql::helpers::prefixed(", ", entries))
}
