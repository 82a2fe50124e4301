//! Rowscope Connectors - dataset I/O around the pure core
//!
//! This crate provides:
//! - CSV text parsing into records and headers
//! - The `*_data.csv` dataset catalog
//! - Local-directory and remote (HTTP mirror) dataset sources
//! - CSV export of filtered record sequences

pub mod catalog;
pub mod csv_connector;
pub mod error;
pub mod export;
pub mod source;

pub use catalog::{build_catalog, entry_for, scan_directory, write_catalog, Catalog, DatasetEntry};
pub use csv_connector::{parse_csv, read_csv_file};
pub use error::{ConnectorError, Result};
pub use export::{export_csv, export_file_name, export_to_dir};
pub use source::{remote_base_url, source_from_config, DatasetSource, LocalSource, RemoteSource};
