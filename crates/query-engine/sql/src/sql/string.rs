//! Type definitions of a low-level SQL string representation.

use indexmap::IndexMap;
use thiserror::Error;

use super::ast::{ParamName, Value};
use super::helpers;

/// SQL text with named parameters, referenced in the text as `:name`.
#[derive(Debug, Clone, PartialEq)]
pub struct SQL {
    pub sql: String,
    pub params: IndexMap<ParamName, Value>,
    /// for internal use and tests only
    pub param_index: u64,
}

impl Default for SQL {
    fn default() -> Self {
        Self::new()
    }
}

/// SQL text whose parameters were rewritten to positional `$n` markers,
/// ready to be handed to a driver.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalSQL {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionalError {
    #[error("parameter ':{0}' is referenced in the query but has no bound value")]
    UnboundParameter(ParamName),
    #[error("the query contains the positional parameter '{0}'; use named ':name' parameters")]
    PositionalParameter(String),
}

impl SQL {
    pub fn new() -> SQL {
        SQL {
            sql: String::new(),
            params: IndexMap::new(),
            param_index: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn append_syntax(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Append an identifier as-is. Callers must only pass names they have already checked.
    pub fn append_identifier(&mut self, name: &str) {
        self.sql.push_str(name);
    }

    /// Bind a value under a freshly generated name and reference it in the text.
    pub fn append_param(&mut self, value: Value) -> ParamName {
        self.param_index += 1;
        let name = ParamName::new(format!("{}{}", helpers::PARAM_PREFIX, self.param_index));
        self.sql.push(':');
        self.sql.push_str(name.as_str());
        self.params.insert(name.clone(), value);
        name
    }

    /// Rewrite named `:name` references into positional `$n` markers.
    ///
    /// References inside string literals, quoted identifiers and comments are left alone,
    /// as are `::type` casts. A name referenced several times shares one position.
    /// Positional `$n` markers written outside literals are refused, since they would alias the
    /// generated ones.
    pub fn to_positional(&self) -> Result<PositionalSQL, PositionalError> {
        let mut out = String::with_capacity(self.sql.len());
        let mut positions: IndexMap<&str, usize> = IndexMap::new();
        let mut params = vec![];

        let mut chars = self.sql.char_indices().peekable();
        while let Some((index, c)) = chars.next() {
            match c {
                '\'' | '"' => {
                    out.push(c);
                    for (_, inner) in chars.by_ref() {
                        out.push(inner);
                        if inner == c {
                            break;
                        }
                    }
                }
                '-' if matches!(chars.peek(), Some((_, '-'))) => {
                    out.push(c);
                    for (_, inner) in chars.by_ref() {
                        out.push(inner);
                        if inner == '\n' {
                            break;
                        }
                    }
                }
                '/' if matches!(chars.peek(), Some((_, '*'))) => {
                    out.push(c);
                    let mut previous = ' ';
                    // skip the opening '*' so "/*/" is not read as a complete comment.
                    if let Some((_, star)) = chars.next() {
                        out.push(star);
                    }
                    for (_, inner) in chars.by_ref() {
                        out.push(inner);
                        if previous == '*' && inner == '/' {
                            break;
                        }
                        previous = inner;
                    }
                }
                '$' if matches!(chars.peek(), Some((_, next)) if next.is_ascii_digit()) => {
                    let mut marker = String::from("$");
                    while let Some((_, next)) = chars.peek() {
                        if next.is_ascii_digit() {
                            marker.push(*next);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    return Err(PositionalError::PositionalParameter(marker));
                }
                ':' if matches!(chars.peek(), Some((_, ':'))) => {
                    out.push_str("::");
                    chars.next();
                }
                ':' if matches!(chars.peek(), Some((_, next)) if is_identifier_start(*next)) => {
                    let start = index + 1;
                    let mut end = start;
                    while let Some((i, next)) = chars.peek() {
                        if is_identifier_part(*next) {
                            end = *i + next.len_utf8();
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    let name = &self.sql[start..end];
                    let position = match positions.get(name) {
                        Some(position) => *position,
                        None => {
                            let value = self
                                .params
                                .get(&ParamName::new(name))
                                .ok_or_else(|| PositionalError::UnboundParameter(name.into()))?;
                            params.push(value.clone());
                            positions.insert(name, params.len());
                            params.len()
                        }
                    };
                    out.push('$');
                    out.push_str(&position.to_string());
                }
                _ => out.push(c),
            }
        }

        Ok(PositionalSQL { sql: out, params })
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
