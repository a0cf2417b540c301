//! Helpers for building SQL strings in certain shapes and patterns.

use super::string::SQL;

/// Prefix of the parameter names generated while rendering filters.
pub const PARAM_PREFIX: &str = "p";

/// Alias given to the resolved template when it is wrapped by a count query.
pub const COUNT_ALIAS: &str = "count_source";

/// A condition that always holds.
pub const TRUE_CONDITION: &str = "1=1";

/// A condition that never holds.
pub const FALSE_CONDITION: &str = "1=0";

/// Wrap a query so that it returns the number of rows it would produce.
pub fn wrap_count(inner: SQL) -> SQL {
    let mut sql = SQL {
        sql: String::with_capacity(inner.sql.len() + 48),
        params: inner.params,
        param_index: inner.param_index,
    };
    sql.append_syntax("SELECT count(*) FROM (");
    sql.append_syntax(&inner.sql);
    sql.append_syntax(") AS ");
    sql.append_syntax(COUNT_ALIAS);
    sql
}

/// Prepend `prefix` to a fragment, unless the fragment is empty.
pub fn prefixed(prefix: &str, fragment: SQL) -> SQL {
    if fragment.is_empty() {
        return fragment;
    }
    let mut sql = SQL {
        sql: String::with_capacity(prefix.len() + fragment.sql.len()),
        params: fragment.params,
        param_index: fragment.param_index,
    };
    sql.append_syntax(prefix);
    sql.append_syntax(&fragment.sql);
    sql
}
