//! Query templates with `{{WHERE}}`, `{{ORDER}}` and `{{PAGING}}` insertion points.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const WHERE_PLACEHOLDER: &str = "{{WHERE}}";
pub const ORDER_PLACEHOLDER: &str = "{{ORDER}}";
pub const PAGING_PLACEHOLDER: &str = "{{PAGING}}";

/// An insertion point in a query template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    /// Receives `and <filter>`.
    Where,
    /// Receives `, <sort entries>`.
    Order,
    /// Receives ` LIMIT <n> OFFSET <m>`.
    Paging,
}

impl Placeholder {
    pub const ALL: [Placeholder; 3] = [Placeholder::Where, Placeholder::Order, Placeholder::Paging];

    /// The literal token template authors write.
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Where => WHERE_PLACEHOLDER,
            Placeholder::Order => ORDER_PLACEHOLDER,
            Placeholder::Paging => PAGING_PLACEHOLDER,
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// A part of a query template, either raw text or an insertion point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    /// A raw text part
    Text(String),
    /// An insertion point
    Placeholder(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("the query template does not contain the placeholder {0}")]
    MissingPlaceholder(Placeholder),
    #[error("the query template contains the placeholder {placeholder} {occurrences} times, expected once")]
    DuplicatePlaceholder {
        placeholder: Placeholder,
        occurrences: usize,
    },
}

/// A hand-written SQL query with one occurrence of each placeholder.
///
/// The SQL itself is not validated; errors in it surface when the query is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QueryTemplate {
    source: String,
    parts: Vec<TemplatePart>,
}

impl QueryTemplate {
    pub fn parse(source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();

        for placeholder in Placeholder::ALL {
            match source.matches(placeholder.token()).count() {
                0 => return Err(TemplateError::MissingPlaceholder(placeholder)),
                1 => {}
                occurrences => {
                    return Err(TemplateError::DuplicatePlaceholder {
                        placeholder,
                        occurrences,
                    })
                }
            }
        }

        let parts = split_parts(&source);
        Ok(QueryTemplate { source, parts })
    }

    /// The template as it was written.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }
}

impl TryFrom<String> for QueryTemplate {
    type Error = TemplateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        QueryTemplate::parse(value)
    }
}

impl From<QueryTemplate> for String {
    fn from(value: QueryTemplate) -> Self {
        value.source
    }
}

impl fmt::Display for QueryTemplate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Split the template at each placeholder token, in order of appearance.
fn split_parts(source: &str) -> Vec<TemplatePart> {
    let mut parts = vec![];
    let mut rest = source;

    loop {
        let next = Placeholder::ALL
            .iter()
            .filter_map(|placeholder| {
                rest.find(placeholder.token())
                    .map(|index| (index, *placeholder))
            })
            .min_by_key(|(index, _)| *index);

        match next {
            None => {
                if !rest.is_empty() {
                    parts.push(TemplatePart::Text(rest.to_string()));
                }
                return parts;
            }
            Some((index, placeholder)) => {
                if index > 0 {
                    parts.push(TemplatePart::Text(rest[..index].to_string()));
                }
                parts.push(TemplatePart::Placeholder(placeholder));
                rest = &rest[index + placeholder.token().len()..];
            }
        }
    }
}
