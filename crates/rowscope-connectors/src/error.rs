//! Typed errors for the connectors crate.

use thiserror::Error;

/// Errors raised while listing, fetching, parsing or exporting datasets.
///
/// The core never sees these; they stop at the load/export boundary.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Reading a local file or directory failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV text could not be tokenized.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A remote fetch failed or returned a non-success status.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// No dataset with this value or file name exists in the catalog.
    #[error("dataset not found: {0}")]
    NotFound(String),

    #[error("no records to export")]
    NothingToExport,
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
