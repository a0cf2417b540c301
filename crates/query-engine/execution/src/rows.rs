//! Rows returned by fetch queries, and their mapping onto holder types.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use query_engine_metadata::metadata::HolderInfo;

/// A single result row, keyed by column name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row(pub serde_json::Map<String, serde_json::Value>);

impl Row {
    pub fn get(&self, column: &str) -> Option<&serde_json::Value> {
        self.0.get(column)
    }
}

impl<K: Into<String>> FromIterator<(K, serde_json::Value)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, serde_json::Value)>>(iter: T) -> Self {
        Row(iter
            .into_iter()
            .map(|(column, value)| (column.into(), value))
            .collect())
    }
}

/// A row could not be turned into a holder.
#[derive(Debug, thiserror::Error)]
pub enum RowMappingError {
    #[error("column '{column}' of holder '{holder}' is missing from the query result")]
    MissingColumn { column: String, holder: String },
    #[error("the query result has a column '{column}' that holder '{holder}' does not declare")]
    UnexpectedColumn { column: String, holder: String },
    #[error("unable to read a row into holder '{holder}': {source}")]
    Deserialize {
        holder: String,
        source: serde_json::Error,
    },
}

/// Rows mapped onto holders one at a time, as they are consumed.
///
/// The columns of the first row are checked against the holder's declared fields; a mismatch is
/// reported once and ends the iteration.
#[derive(Debug)]
pub struct MappedRows<H> {
    holder: HolderInfo,
    rows: std::vec::IntoIter<Row>,
    checked: bool,
    kind: PhantomData<fn() -> H>,
}

impl<H> MappedRows<H> {
    pub fn new(holder: HolderInfo, rows: Vec<Row>) -> Self {
        MappedRows {
            holder,
            rows: rows.into_iter(),
            checked: false,
            kind: PhantomData,
        }
    }
}

impl<H: DeserializeOwned> Iterator for MappedRows<H> {
    type Item = Result<H, RowMappingError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;

        if !self.checked {
            self.checked = true;
            if let Err(err) = check_columns(&self.holder, &row) {
                self.rows = Vec::new().into_iter();
                return Some(Err(err));
            }
        }

        Some(
            serde_json::from_value(serde_json::Value::Object(row.0)).map_err(|source| {
                RowMappingError::Deserialize {
                    holder: self.holder.name.clone(),
                    source,
                }
            }),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.checked {
            self.rows.size_hint()
        } else {
            // the first row may turn into a single error.
            (self.rows.len().min(1), Some(self.rows.len()))
        }
    }
}

/// Every declared field must be present, and nothing else.
fn check_columns(holder: &HolderInfo, row: &Row) -> Result<(), RowMappingError> {
    for field in &holder.fields {
        if !row.0.contains_key(field.as_str()) {
            return Err(RowMappingError::MissingColumn {
                column: field.to_string(),
                holder: holder.name.clone(),
            });
        }
    }
    for column in row.0.keys() {
        if !holder.fields.iter().any(|field| field.as_str() == column) {
            return Err(RowMappingError::UnexpectedColumn {
                column: column.clone(),
                holder: holder.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Person {
        id: i64,
        name: String,
    }

    fn holder() -> HolderInfo {
        HolderInfo::new("Person", ["id", "name"])
    }

    fn person(id: i64, name: &str) -> Row {
        [("id", json!(id)), ("name", json!(name))]
            .into_iter()
            .collect()
    }

    #[test]
    fn maps_rows_onto_holders_in_order() {
        let rows = MappedRows::<Person>::new(holder(), vec![person(1, "alice"), person(2, "bob")]);
        let people: Vec<Person> = rows.collect::<Result<_, _>>().unwrap();
        assert_eq!(
            people,
            vec![
                Person {
                    id: 1,
                    name: "alice".to_string()
                },
                Person {
                    id: 2,
                    name: "bob".to_string()
                },
            ]
        );
    }

    #[test]
    fn missing_column_fails_once() {
        let row: Row = [("id", json!(1))].into_iter().collect();
        let mut rows = MappedRows::<Person>::new(holder(), vec![row, person(2, "bob")]);

        assert!(matches!(
            rows.next(),
            Some(Err(RowMappingError::MissingColumn { column, .. })) if column == "name"
        ));
        assert!(rows.next().is_none());
    }

    #[test]
    fn undeclared_column_is_not_dropped_silently() {
        let mut row = person(1, "alice");
        row.0.insert("salary".to_string(), json!(10));
        let mut rows = MappedRows::<Person>::new(holder(), vec![row]);

        assert!(matches!(
            rows.next(),
            Some(Err(RowMappingError::UnexpectedColumn { column, .. })) if column == "salary"
        ));
    }

    #[test]
    fn type_mismatch_is_reported() {
        let row: Row = [("id", json!("one")), ("name", json!("alice"))]
            .into_iter()
            .collect();
        let mut rows = MappedRows::<Person>::new(holder(), vec![row]);
        assert!(matches!(
            rows.next(),
            Some(Err(RowMappingError::Deserialize { .. }))
        ));
    }

    #[test]
    fn no_rows_no_holders() {
        let mut rows = MappedRows::<Person>::new(holder(), vec![]);
        assert!(rows.next().is_none());
    }
}
