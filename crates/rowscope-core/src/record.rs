//! Dataset records and empty-row normalization

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One row of a dataset: header name -> optional cell value.
///
/// Records from different files rarely share a key set, so a missing header
/// is simply absent rather than stored as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Option<String>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used while a record is being assembled.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), Some(value.into()));
        self
    }

    /// Raw value of `field`, untrimmed. `None` when the field is missing or null.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_deref())
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when no field carries a non-whitespace value.
    pub fn is_blank(&self) -> bool {
        self.fields
            .values()
            .all(|v| v.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

impl From<BTreeMap<String, Option<String>>> for Record {
    fn from(fields: BTreeMap<String, Option<String>>) -> Self {
        Self { fields }
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        }
    }
}

/// A parsed dataset: its records plus the header order used for display and export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub headers: Vec<String>,
}

impl Dataset {
    /// Build a dataset, dropping blank rows.
    pub fn new(records: Vec<Record>, headers: Vec<String>) -> Self {
        Self {
            records: normalize_records(records),
            headers,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Keep only records with at least one non-blank value. Order is preserved.
pub fn normalize_records(records: Vec<Record>) -> Vec<Record> {
    let before = records.len();
    let kept: Vec<Record> = records.into_iter().filter(|r| !r.is_blank()).collect();
    if kept.len() != before {
        debug!("Dropped {} blank records", before - kept.len());
    }
    kept
}
