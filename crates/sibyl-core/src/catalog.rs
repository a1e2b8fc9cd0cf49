use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::evidence::as_binary;

/// Columns that never carry an attribute, whatever their contents.
const RESERVED_COLUMNS: &[&str] = &["id", "_id", "created_at", "updated_at"];

/// One labeled example: an entity name and its binary attribute values,
/// aligned with [`Catalog::columns`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogRow {
    pub name: String,
    pub values: Vec<u8>,
}

/// Binary attribute matrix over the candidate entities.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    columns: Vec<String>,
    rows: Vec<CatalogRow>,
    column_index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from already-normalized parts. Every row must have
    /// one value per column; values other than 0 count as 1.
    pub fn new(columns: Vec<String>, rows: Vec<CatalogRow>) -> Self {
        let column_index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.values.resize(width, 0);
                for v in row.values.iter_mut() {
                    *v = u8::from(*v != 0);
                }
                row
            })
            .collect();

        Self {
            columns,
            rows,
            column_index,
        }
    }

    /// Normalizes raw tabular rows (JSON objects) into a catalog.
    ///
    /// Rows without a non-empty string in `name_column` are dropped. A column
    /// becomes an attribute only when all of its non-null values are binary;
    /// nulls and missing cells load as 0.
    pub fn from_records(records: &[Map<String, Value>], name_column: &str) -> Self {
        let mut candidates: BTreeSet<&str> = BTreeSet::new();
        let mut rejected: BTreeSet<&str> = BTreeSet::new();

        for record in records {
            for (key, value) in record {
                if key == name_column || RESERVED_COLUMNS.contains(&key.as_str()) {
                    continue;
                }
                if value.is_null() || as_binary(value).is_some() {
                    candidates.insert(key.as_str());
                } else {
                    rejected.insert(key.as_str());
                }
            }
        }

        for column in &rejected {
            debug!(column = %column, "Ignoring non-binary catalog column");
        }

        let columns: Vec<String> = candidates
            .difference(&rejected)
            .map(|c| c.to_string())
            .collect();

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let name = match record.get(name_column).and_then(Value::as_str).map(str::trim) {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => {
                    debug!(name_column, "Dropping catalog row without a name");
                    continue;
                }
            };
            let values = columns
                .iter()
                .map(|c| record.get(c).and_then(as_binary).unwrap_or(0))
                .collect();
            rows.push(CatalogRow { name, values });
        }

        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    pub fn has_column(&self, attribute: &str) -> bool {
        self.column_index.contains_key(attribute)
    }

    pub fn column_position(&self, attribute: &str) -> Option<usize> {
        self.column_index.get(attribute).copied()
    }

    /// Entity names in first-appearance order, without duplicates.
    pub fn entity_names(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.rows
            .iter()
            .filter(|r| seen.insert(r.name.as_str()))
            .map(|r| r.name.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Per-topic attribute list, as stored in the manifest documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    #[serde(rename = "atributos", alias = "attributes", default)]
    pub attributes: Vec<String>,
}

impl Manifest {
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
        }
    }
}
