//! Handle filtering/where clauses translation.

use query_engine_metadata::metadata::HolderInfo;
use query_engine_sql::sql;

use crate::translation::error::Error;

/// Translate the grid's filter into the `{{WHERE}}` fragment: `and <expression>`,
/// or nothing at all when there is no filter.
pub(crate) fn translate_filter(
    holder: &HolderInfo,
    filter: Option<&sql::ast::Filter>,
) -> Result<sql::string::SQL, Error> {
    let mut expression = sql::string::SQL::new();

    if let Some(filter) = filter {
        check_fields(holder, filter.fields())?;
        filter.to_sql(&mut expression);
    }

    Ok(sql::helpers::prefixed("and ", expression))
}

/// Every field the grid refers to must be a declared holder field; they are written
/// into the query text verbatim.
pub(crate) fn check_fields<'a>(
    holder: &HolderInfo,
    fields: impl IntoIterator<Item = &'a sql::ast::FieldName>,
) -> Result<(), Error> {
    for field in fields {
        if !holder.has_field(field) {
            return Err(Error::FieldNotFound {
                field: field.clone(),
                holder: holder.name.clone(),
            });
        }
    }
    Ok(())
}
