//! Convert filter, ordering and paging requests to low-level SQL strings.

use super::ast::*;
use super::helpers;
use super::string::SQL;

// Convert to SQL strings

impl Filter {
    /// Render as a SQL-92 boolean expression, binding every value as a parameter.
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            Filter::And { expressions } => {
                join_expressions(sql, expressions, " AND ", helpers::TRUE_CONDITION);
            }
            Filter::Or { expressions } => {
                join_expressions(sql, expressions, " OR ", helpers::FALSE_CONDITION);
            }
            Filter::Not { expression } => {
                sql.append_syntax("NOT (");
                expression.to_sql(sql);
                sql.append_syntax(")");
            }
            Filter::Compare {
                field,
                operator,
                value,
            } => comparison(sql, field, *operator, value.clone()),
            Filter::Range { field, min, max } => match (min, max) {
                (Some(min), Some(max)) => {
                    sql.append_syntax("(");
                    comparison(
                        sql,
                        field,
                        ComparisonOperator::GreaterThanOrEqualTo,
                        min.clone(),
                    );
                    sql.append_syntax(" AND ");
                    comparison(
                        sql,
                        field,
                        ComparisonOperator::LessThanOrEqualTo,
                        max.clone(),
                    );
                    sql.append_syntax(")");
                }
                (Some(min), None) => comparison(
                    sql,
                    field,
                    ComparisonOperator::GreaterThanOrEqualTo,
                    min.clone(),
                ),
                (None, Some(max)) => comparison(
                    sql,
                    field,
                    ComparisonOperator::LessThanOrEqualTo,
                    max.clone(),
                ),
                (None, None) => sql.append_syntax(helpers::TRUE_CONDITION),
            },
            Filter::In { field, values } => {
                if values.is_empty() {
                    sql.append_syntax(helpers::FALSE_CONDITION);
                } else {
                    sql.append_identifier(field.as_str());
                    sql.append_syntax(" IN (");
                    for (index, value) in values.iter().enumerate() {
                        if index > 0 {
                            sql.append_syntax(", ");
                        }
                        sql.append_param(value.clone());
                    }
                    sql.append_syntax(")");
                }
            }
            Filter::IsNull { field } => {
                sql.append_identifier(field.as_str());
                sql.append_syntax(" IS NULL");
            }
            Filter::IsNotNull { field } => {
                sql.append_identifier(field.as_str());
                sql.append_syntax(" IS NOT NULL");
            }
        }
    }
}

fn comparison(sql: &mut SQL, field: &FieldName, operator: ComparisonOperator, value: Value) {
    sql.append_identifier(field.as_str());
    sql.append_syntax(operator.sql());
    sql.append_param(value);
}

fn join_expressions(sql: &mut SQL, expressions: &[Filter], separator: &str, empty: &str) {
    match expressions {
        [] => sql.append_syntax(empty),
        [single] => single.to_sql(sql),
        _ => {
            sql.append_syntax("(");
            for (index, expression) in expressions.iter().enumerate() {
                if index > 0 {
                    sql.append_syntax(separator);
                }
                expression.to_sql(sql);
            }
            sql.append_syntax(")");
        }
    }
}

impl OrderBy {
    /// Render as a comma separated list of sort entries. Nothing is written for an empty list.
    pub fn to_sql(&self, sql: &mut SQL) {
        for (index, element) in self.elements.iter().enumerate() {
            if index > 0 {
                sql.append_syntax(", ");
            }
            element.to_sql(sql);
        }
    }
}

impl OrderByElement {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_identifier(self.field.as_str());
        self.direction.to_sql(sql);
    }
}

impl OrderByDirection {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            OrderByDirection::Asc => sql.append_syntax(" ASC"),
            OrderByDirection::Desc => sql.append_syntax(" DESC"),
        }
    }
}

impl PageWindow {
    /// Render as ` LIMIT <limit> OFFSET <offset>`, in that order, when the window is bounded.
    pub fn to_sql(&self, sql: &mut SQL) {
        if let Some((limit, offset)) = self.bounds() {
            sql.append_syntax(&format!(" LIMIT {limit} OFFSET {offset}"));
        }
    }
}
