//! Dataset catalog: turns `*_data.csv` file names into selectable entries.

use std::cmp::Ordering;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ConnectorError, Result};

/// Suffix every dataset file carries.
pub const DATA_FILE_SUFFIX: &str = "_data.csv";

/// File name of the generated catalog.
pub const CATALOG_FILE: &str = "locations.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetEntry {
    /// File name without the suffix, e.g. `dubai_hills_2025`.
    pub value: String,
    /// Human label, e.g. `Dubai Hills 2025`.
    pub label: String,
    pub file_name: String,
}

/// Wire shape of `locations.json` and `GET /api/locations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub locations: Vec<DatasetEntry>,
}

impl Catalog {
    /// Entry whose value or file name equals `key`.
    pub fn find(&self, key: &str) -> Option<&DatasetEntry> {
        self.locations
            .iter()
            .find(|e| e.value == key || e.file_name == key)
    }

    pub fn get(&self, key: &str) -> Result<&DatasetEntry> {
        self.find(key)
            .ok_or_else(|| ConnectorError::NotFound(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Build an entry from a dataset file name, or `None` if it is not a dataset file.
pub fn entry_for(file_name: &str) -> Option<DatasetEntry> {
    let value = file_name.strip_suffix(DATA_FILE_SUFFIX)?;
    let label = value
        .split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");
    Some(DatasetEntry {
        value: value.to_string(),
        label,
        file_name: file_name.to_string(),
    })
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Keep dataset files and sort them by label.
pub fn build_catalog<I, S>(file_names: I) -> Catalog
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut locations: Vec<DatasetEntry> = file_names
        .into_iter()
        .filter_map(|name| entry_for(name.as_ref()))
        .collect();
    locations.sort_by(|a, b| compare_labels(&a.label, &b.label));
    Catalog { locations }
}

/// List dataset files in a directory.
pub async fn scan_directory(dir: impl AsRef<Path>) -> Result<Catalog> {
    let mut entries = tokio::fs::read_dir(dir.as_ref()).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    Ok(build_catalog(names))
}

/// Write the catalog for `data_dir` as pretty JSON to `output`.
pub async fn write_catalog(data_dir: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<Catalog> {
    let catalog = scan_directory(data_dir).await?;
    let json = serde_json::to_string_pretty(&catalog)?;
    tokio::fs::write(output.as_ref(), json).await?;
    info!(
        "Generated {:?} with {} datasets",
        output.as_ref(),
        catalog.len()
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_for_label() {
        let entry = entry_for("dubai_hills_2025_data.csv").unwrap();
        assert_eq!(entry.value, "dubai_hills_2025");
        assert_eq!(entry.label, "Dubai Hills 2025");
        assert_eq!(entry.file_name, "dubai_hills_2025_data.csv");
    }

    #[test]
    fn test_entry_for_rejects_other_files() {
        assert!(entry_for("notes.csv").is_none());
        assert!(entry_for("marina_data.csv.bak").is_none());
        assert!(entry_for("locations.json").is_none());
    }

    #[test]
    fn test_entry_for_keeps_rest_of_word() {
        let entry = entry_for("jBR_walk_data.csv").unwrap();
        assert_eq!(entry.label, "JBR Walk");
    }

    #[test]
    fn test_build_catalog_sorted_by_label() {
        let catalog = build_catalog([
            "palm_jumeirah_data.csv",
            "readme.md",
            "business_bay_data.csv",
            "al_barsha_data.csv",
        ]);
        let labels: Vec<_> = catalog.locations.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Al Barsha", "Business Bay", "Palm Jumeirah"]);
    }

    #[test]
    fn test_catalog_find_by_value_or_file() {
        let catalog = build_catalog(["marina_data.csv"]);
        assert!(catalog.find("marina").is_some());
        assert!(catalog.find("marina_data.csv").is_some());
        assert!(matches!(catalog.get("downtown"), Err(ConnectorError::NotFound(_))));
    }

    #[test]
    fn test_catalog_json_shape() {
        let catalog = build_catalog(["marina_data.csv"]);
        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "locations": [
                    {"value": "marina", "label": "Marina", "fileName": "marina_data.csv"}
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_write_catalog() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("downtown_data.csv"), "name\n").unwrap();
        std::fs::write(dir.path().join("other.txt"), "").unwrap();
        let out = dir.path().join(CATALOG_FILE);

        let catalog = write_catalog(dir.path(), &out).await.unwrap();
        assert_eq!(catalog.len(), 1);

        let written: Catalog = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written, catalog);
    }
}
