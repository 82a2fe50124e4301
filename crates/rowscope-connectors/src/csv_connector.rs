//! CSV text -> [`Dataset`] parsing.
//!
//! The first row is the header row. Header names are trimmed, blank lines are
//! skipped and rows may be ragged: missing trailing cells are left absent and
//! cells beyond the header count are dropped. Fully blank rows are removed by
//! the core normalizer before the dataset is returned.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use rowscope_core::{Dataset, Record};
use tracing::{debug, info};

use crate::error::Result;

/// Parse CSV text into records and headers.
pub fn parse_csv(text: &str) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let mut fields = BTreeMap::new();
        for (header, value) in headers.iter().zip(row.iter()) {
            // Duplicate header names: the leftmost column wins.
            if let Entry::Vacant(slot) = fields.entry(header.clone()) {
                slot.insert(Some(value.to_string()));
            }
        }
        records.push(Record::from(fields));
    }

    let parsed = records.len();
    let dataset = Dataset::new(records, headers);
    debug!(
        "Parsed {} rows ({} non-blank) across {} columns",
        parsed,
        dataset.len(),
        dataset.headers.len()
    );
    Ok(dataset)
}

/// Read and parse a CSV file from disk.
pub async fn read_csv_file(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await?;
    let dataset = parse_csv(&text)?;
    info!("Loaded {} records from {:?}", dataset.len(), path);
    Ok(dataset)
}
