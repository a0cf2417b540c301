//! Resolve a grid query against the query template.

mod filtering;
mod paging;
mod sorting;

use query_engine_metadata::metadata::{Metadata, Placeholder, TemplatePart};
use query_engine_sql::sql;
use query_engine_sql::sql::execution_plan::{Count, ExecutionPlan, Fetch};

use super::error::{Error, ParameterCollision};
use super::request::GridQuery;

/// The SQL fragments that replace each placeholder of the template.
struct Fragments {
    where_: sql::string::SQL,
    order_by: sql::string::SQL,
    paging: sql::string::SQL,
}

/// Translate a grid query into a query counting every row that matches its filter.
///
/// Sort orders and the page window are ignored.
pub fn translate_count(
    metadata: &Metadata,
    request: &GridQuery,
) -> Result<ExecutionPlan<Count>, Error> {
    let fragments = Fragments {
        where_: filtering::translate_filter(&metadata.holder, request.filter.as_ref())?,
        order_by: sql::string::SQL::new(),
        paging: sql::string::SQL::new(),
    };

    let resolved = resolve_template(metadata, request, fragments)?;
    let query = sql::helpers::wrap_count(resolved);

    tracing::debug!(
        generated_sql = %query.sql,
        params = ?query.params,
        "resolved count query"
    );

    Ok(ExecutionPlan::new(metadata.holder.name.clone(), query))
}

/// Translate a grid query into a query fetching one page of matching, sorted rows.
pub fn translate_fetch(
    metadata: &Metadata,
    request: &GridQuery,
) -> Result<ExecutionPlan<Fetch>, Error> {
    let fragments = Fragments {
        where_: filtering::translate_filter(&metadata.holder, request.filter.as_ref())?,
        order_by: sorting::translate_order_by(&metadata.holder, &request.order_by)?,
        paging: paging::translate_page(&request.page),
    };

    let query = resolve_template(metadata, request, fragments)?;

    tracing::debug!(
        generated_sql = %query.sql,
        params = ?query.params,
        "resolved fetch query"
    );

    Ok(ExecutionPlan::new(metadata.holder.name.clone(), query))
}

/// Substitute each placeholder with its fragment, and bind the static parameters
/// together with the parameters the fragments introduced.
fn resolve_template(
    metadata: &Metadata,
    request: &GridQuery,
    fragments: Fragments,
) -> Result<sql::string::SQL, Error> {
    let mut sql = sql::string::SQL::new();

    for (name, value) in metadata.parameters.iter() {
        sql.params.insert(name.clone(), value.clone());
    }

    // only the filter contributes parameters.
    for (name, value) in &fragments.where_.params {
        if metadata.parameters.contains(name) {
            return Err(ParameterCollision {
                name: name.clone(),
                value: value.clone(),
                filter: request
                    .filter
                    .clone()
                    .unwrap_or_else(|| sql::ast::Filter::and(vec![])),
                template: metadata.template.source().to_string(),
                parameters: metadata.parameters.clone(),
            }
            .into());
        }
        sql.params.insert(name.clone(), value.clone());
    }
    sql.param_index = fragments.where_.param_index;

    for part in metadata.template.parts() {
        match part {
            TemplatePart::Text(text) => sql.append_syntax(text),
            TemplatePart::Placeholder(Placeholder::Where) => {
                sql.append_syntax(&fragments.where_.sql);
            }
            TemplatePart::Placeholder(Placeholder::Order) => {
                sql.append_syntax(&fragments.order_by.sql);
            }
            TemplatePart::Placeholder(Placeholder::Paging) => {
                sql.append_syntax(&fragments.paging.sql);
            }
        }
    }

    Ok(sql)
}
