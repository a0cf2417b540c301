//! Type definitions of the filter, ordering and paging requests a grid sends us.

use std::fmt;
use std::num::NonZeroU32;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// The name of a holder field, which is also the name of a result column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct FieldName(pub SmolStr);

impl FieldName {
    pub fn new(name: impl AsRef<str>) -> Self {
        FieldName(SmolStr::new(name))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for FieldName {
    fn from(value: &str) -> Self {
        FieldName::new(value)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name of a bound parameter, referenced as `:name` in SQL text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ParamName(pub SmolStr);

impl ParamName {
    pub fn new(name: impl AsRef<str>) -> Self {
        ParamName(SmolStr::new(name))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ParamName {
    fn from(value: &str) -> Self {
        ParamName::new(value)
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A scalar value bound to a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int8(i64),
    Float8(f64),
    String(String),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int8(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int8(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float8(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// Displayed as a SQL literal, for diagnostics only. Values are never inlined into queries.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int8(i) => write!(f, "{i}"),
            Value::Float8(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

/// A filter expression contributed by the grid's column filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    /// All of the expressions hold. An empty list always holds.
    And { expressions: Vec<Filter> },
    /// Any of the expressions holds. An empty list never holds.
    Or { expressions: Vec<Filter> },
    /// The expression does not hold.
    Not { expression: Box<Filter> },
    /// Compare a field against a value.
    Compare {
        field: FieldName,
        operator: ComparisonOperator,
        value: Value,
    },
    /// An inclusive range. A missing bound is open.
    Range {
        field: FieldName,
        min: Option<Value>,
        max: Option<Value>,
    },
    /// The field equals one of the values.
    In { field: FieldName, values: Vec<Value> },
    IsNull { field: FieldName },
    IsNotNull { field: FieldName },
}

impl Filter {
    pub fn equals(field: impl Into<FieldName>, value: impl Into<Value>) -> Filter {
        Filter::compare(field, ComparisonOperator::Equals, value)
    }

    pub fn compare(
        field: impl Into<FieldName>,
        operator: ComparisonOperator,
        value: impl Into<Value>,
    ) -> Filter {
        Filter::Compare {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn between(
        field: impl Into<FieldName>,
        min: Option<Value>,
        max: Option<Value>,
    ) -> Filter {
        Filter::Range {
            field: field.into(),
            min,
            max,
        }
    }

    pub fn and(expressions: Vec<Filter>) -> Filter {
        Filter::And { expressions }
    }

    pub fn or(expressions: Vec<Filter>) -> Filter {
        Filter::Or { expressions }
    }

    pub fn not(expression: Filter) -> Filter {
        Filter::Not {
            expression: Box::new(expression),
        }
    }

    /// Every field referenced anywhere in this filter, in depth-first order.
    pub fn fields(&self) -> Vec<&FieldName> {
        let mut fields = vec![];
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, fields: &mut Vec<&'a FieldName>) {
        match self {
            Filter::And { expressions } | Filter::Or { expressions } => {
                for expression in expressions {
                    expression.collect_fields(fields);
                }
            }
            Filter::Not { expression } => expression.collect_fields(fields),
            Filter::Compare { field, .. }
            | Filter::Range { field, .. }
            | Filter::In { field, .. }
            | Filter::IsNull { field }
            | Filter::IsNotNull { field } => fields.push(field),
        }
    }
}

/// A readable rendering of the filter with values inlined, used in error messages.
impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn join(f: &mut fmt::Formatter, expressions: &[Filter], sep: &str) -> fmt::Result {
            write!(f, "(")?;
            for (index, expression) in expressions.iter().enumerate() {
                if index > 0 {
                    write!(f, "{sep}")?;
                }
                write!(f, "{expression}")?;
            }
            write!(f, ")")
        }

        match self {
            Filter::And { expressions } => join(f, expressions, " AND "),
            Filter::Or { expressions } => join(f, expressions, " OR "),
            Filter::Not { expression } => write!(f, "NOT {expression}"),
            Filter::Compare {
                field,
                operator,
                value,
            } => write!(f, "{field}{}{value}", operator.sql()),
            Filter::Range { field, min, max } => match (min, max) {
                (Some(min), Some(max)) => write!(f, "{field} BETWEEN {min} AND {max}"),
                (Some(min), None) => write!(f, "{field}>={min}"),
                (None, Some(max)) => write!(f, "{field}<={max}"),
                (None, None) => write!(f, "{field} unbounded"),
            },
            Filter::In { field, values } => {
                write!(f, "{field} IN (")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, ")")
            }
            Filter::IsNull { field } => write!(f, "{field} IS NULL"),
            Filter::IsNotNull { field } => write!(f, "{field} IS NOT NULL"),
        }
    }
}

/// A comparison operator usable in a `Compare` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    Like,
    NotLike,
}

impl ComparisonOperator {
    /// The SQL-92 spelling of the operator, including any surrounding whitespace.
    pub fn sql(self) -> &'static str {
        match self {
            ComparisonOperator::Equals => "=",
            ComparisonOperator::NotEquals => "<>",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanOrEqualTo => "<=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanOrEqualTo => ">=",
            ComparisonOperator::Like => " LIKE ",
            ComparisonOperator::NotLike => " NOT LIKE ",
        }
    }
}

/// An ORDER BY request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct OrderBy {
    pub elements: Vec<OrderByElement>,
}

impl OrderBy {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// A single sort entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OrderByElement {
    pub field: FieldName,
    pub direction: OrderByDirection,
}

impl OrderByElement {
    pub fn asc(field: impl Into<FieldName>) -> Self {
        OrderByElement {
            field: field.into(),
            direction: OrderByDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<FieldName>) -> Self {
        OrderByElement {
            field: field.into(),
            direction: OrderByDirection::Desc,
        }
    }
}

/// A direction for a single sort entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderByDirection {
    Asc,
    Desc,
}

/// The number of rows a grid asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RowLimit {
    Rows(NonZeroU32),
    Unbounded,
}

/// Grids signal "no limit" with the largest representable count; zero is read the same way.
impl From<u32> for RowLimit {
    fn from(value: u32) -> Self {
        match NonZeroU32::new(value) {
            Some(rows) if value != u32::MAX => RowLimit::Rows(rows),
            _ => RowLimit::Unbounded,
        }
    }
}

/// The window of rows to fetch. Paging applies only when both halves are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageWindow {
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub limit: Option<RowLimit>,
}

impl PageWindow {
    pub fn new(offset: u32, limit: u32) -> Self {
        PageWindow {
            offset: Some(offset),
            limit: Some(RowLimit::from(limit)),
        }
    }

    /// The bounded `(limit, offset)` pair, if this window restricts the result.
    pub fn bounds(&self) -> Option<(NonZeroU32, u32)> {
        match (self.limit, self.offset) {
            (Some(RowLimit::Rows(limit)), Some(offset)) => Some((limit, offset)),
            _ => None,
        }
    }
}
