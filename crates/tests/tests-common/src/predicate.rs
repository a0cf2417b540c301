//! Evaluate a filter against a fetched row, following SQL's three-valued logic.
//!
//! Used to check that every row a filtered query returns does satisfy the filter.

use std::cmp::Ordering;

use serde_json::Value as Json;

use query_engine_execution::rows::Row;
use query_engine_sql::sql::ast::{ComparisonOperator, Filter, Value};

/// Whether the database would keep this row for the filter.
pub fn satisfies(filter: &Filter, row: &Row) -> bool {
    evaluate(filter, row) == Some(true)
}

/// `None` stands for SQL's unknown.
fn evaluate(filter: &Filter, row: &Row) -> Option<bool> {
    match filter {
        Filter::And { expressions } => {
            let results: Vec<Option<bool>> = expressions.iter().map(|e| evaluate(e, row)).collect();
            if results.contains(&Some(false)) {
                Some(false)
            } else if results.contains(&None) {
                None
            } else {
                Some(true)
            }
        }
        Filter::Or { expressions } => {
            let results: Vec<Option<bool>> = expressions.iter().map(|e| evaluate(e, row)).collect();
            if results.contains(&Some(true)) {
                Some(true)
            } else if results.contains(&None) {
                None
            } else {
                Some(false)
            }
        }
        Filter::Not { expression } => evaluate(expression, row).map(|result| !result),
        Filter::Compare {
            field,
            operator,
            value,
        } => compare(column(row, field.as_str())?, *operator, value),
        Filter::Range { field, min, max } => {
            let actual = column(row, field.as_str());
            let lower = match min {
                Some(min) => compare(actual?, ComparisonOperator::GreaterThanOrEqualTo, min),
                None => Some(true),
            };
            let upper = match max {
                Some(max) => compare(actual?, ComparisonOperator::LessThanOrEqualTo, max),
                None => Some(true),
            };
            evaluate_and(lower, upper)
        }
        Filter::In { field, values } => {
            if values.is_empty() {
                return Some(false);
            }
            let actual = column(row, field.as_str())?;
            Some(
                values
                    .iter()
                    .any(|value| compare(actual, ComparisonOperator::Equals, value) == Some(true)),
            )
        }
        Filter::IsNull { field } => Some(column(row, field.as_str()).is_none()),
        Filter::IsNotNull { field } => Some(column(row, field.as_str()).is_some()),
    }
}

fn evaluate_and(left: Option<bool>, right: Option<bool>) -> Option<bool> {
    match (left, right) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(true), Some(true)) => Some(true),
        _ => None,
    }
}

/// The non-null value of a column.
fn column<'a>(row: &'a Row, name: &str) -> Option<&'a Json> {
    row.get(name).filter(|value| !value.is_null())
}

fn compare(actual: &Json, operator: ComparisonOperator, expected: &Value) -> Option<bool> {
    match operator {
        ComparisonOperator::Like => like(actual, expected),
        ComparisonOperator::NotLike => like(actual, expected).map(|matched| !matched),
        _ => {
            let ordering = order(actual, expected)?;
            Some(match operator {
                ComparisonOperator::Equals => ordering == Ordering::Equal,
                ComparisonOperator::NotEquals => ordering != Ordering::Equal,
                ComparisonOperator::LessThan => ordering == Ordering::Less,
                ComparisonOperator::LessThanOrEqualTo => ordering != Ordering::Greater,
                ComparisonOperator::GreaterThan => ordering == Ordering::Greater,
                ComparisonOperator::GreaterThanOrEqualTo => ordering != Ordering::Less,
                ComparisonOperator::Like | ComparisonOperator::NotLike => unreachable!(),
            })
        }
    }
}

fn order(actual: &Json, expected: &Value) -> Option<Ordering> {
    match (actual, expected) {
        (_, Value::Null) => None,
        (Json::Number(number), Value::Int8(i)) => number.as_f64()?.partial_cmp(&(*i as f64)),
        (Json::Number(number), Value::Float8(f)) => number.as_f64()?.partial_cmp(f),
        (Json::String(s), Value::String(e)) => Some(s.as_str().cmp(e.as_str())),
        (Json::Bool(b), Value::Bool(e)) => Some(b.cmp(e)),
        (Json::Number(number), Value::Bool(e)) => {
            number.as_f64()?.partial_cmp(&f64::from(u8::from(*e)))
        }
        _ => None,
    }
}

/// SQLite's LIKE: `%` matches any run, `_` any single character, ASCII letters ignore case.
fn like(actual: &Json, pattern: &Value) -> Option<bool> {
    let (Json::String(text), Value::String(pattern)) = (actual, pattern) else {
        return None;
    };
    let text: Vec<char> = text.chars().map(|c| c.to_ascii_lowercase()).collect();
    let pattern: Vec<char> = pattern.chars().map(|c| c.to_ascii_lowercase()).collect();
    Some(like_match(&text, &pattern))
}

fn like_match(text: &[char], pattern: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some(('%', rest)) => (0..=text.len()).any(|skip| like_match(&text[skip..], rest)),
        Some(('_', rest)) => !text.is_empty() && like_match(&text[1..], rest),
        Some((c, rest)) => text.first() == Some(c) && like_match(&text[1..], rest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(age: Json) -> Row {
        [("name", json!("Alice")), ("age", age)].into_iter().collect()
    }

    #[test]
    fn comparisons_with_null_are_unknown() {
        let filter = Filter::compare("age", ComparisonOperator::GreaterThan, 30);
        assert!(satisfies(&filter, &row(json!(34))));
        assert!(!satisfies(&filter, &row(Json::Null)));
        assert!(!satisfies(&Filter::not(filter), &row(Json::Null)));
    }

    #[test]
    fn like_ignores_ascii_case() {
        let filter = Filter::compare("name", ComparisonOperator::Like, "al%");
        assert!(satisfies(&filter, &row(json!(1))));
        let filter = Filter::compare("name", ComparisonOperator::Like, "_lic");
        assert!(!satisfies(&filter, &row(json!(1))));
    }

    #[test]
    fn unknown_or_true_is_true() {
        let filter = Filter::or(vec![
            Filter::compare("age", ComparisonOperator::Equals, 1),
            Filter::IsNull {
                field: "age".into(),
            },
        ]);
        assert!(satisfies(&filter, &row(Json::Null)));
    }
}
