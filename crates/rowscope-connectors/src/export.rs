//! Export of the current record sequence as CSV.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rowscope_core::Record;
use tracing::info;

use crate::error::{ConnectorError, Result};

/// Write `records` as CSV with `headers` as the column order. Absent cells are
/// written empty. Returns the number of data rows written.
pub fn export_csv<'a, I, W>(records: I, headers: &[String], writer: W) -> Result<usize>
where
    I: IntoIterator<Item = &'a Record>,
    W: Write,
{
    let mut records = records.into_iter().peekable();
    if records.peek().is_none() {
        return Err(ConnectorError::NothingToExport);
    }

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(headers)?;

    let mut written = 0;
    for record in records {
        wtr.write_record(headers.iter().map(|h| record.get(h).unwrap_or("")))?;
        written += 1;
    }
    wtr.flush()?;
    Ok(written)
}

/// `<label>_filtered_<timestamp>.csv`, timestamp to the second with `:` and `.`
/// replaced so the name is safe on every filesystem.
pub fn export_file_name(label: &str, now: DateTime<Utc>) -> String {
    format!("{}_filtered_{}.csv", label, now.format("%Y-%m-%dT%H-%M-%S"))
}

/// Export to a new file in `dir`, named with [`export_file_name`].
pub fn export_to_dir<'a, I>(records: I, headers: &[String], dir: &Path, label: &str) -> Result<PathBuf>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut records = records.into_iter().peekable();
    if records.peek().is_none() {
        return Err(ConnectorError::NothingToExport);
    }

    let path = dir.join(export_file_name(label, Utc::now()));
    let file = std::fs::File::create(&path)?;
    let written = export_csv(records, headers, file)?;
    info!("Exported {} records to {:?}", written, path);
    Ok(path)
}
