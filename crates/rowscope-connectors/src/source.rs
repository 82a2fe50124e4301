//! Dataset sources: where the catalog and raw CSV text come from.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use rowscope_core::Dataset;
use tracing::{debug, info};
use url::Url;

use crate::catalog::{build_catalog, scan_directory, Catalog, DatasetEntry, CATALOG_FILE};
use crate::csv_connector::parse_csv;
use crate::error::{ConnectorError, Result};

/// A place datasets can be listed and fetched from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Short description for logs, e.g. the directory or base URL.
    fn describe(&self) -> String;

    async fn catalog(&self) -> Result<Catalog>;

    /// Raw CSV text of a dataset file.
    async fn load_text(&self, file_name: &str) -> Result<String>;

    /// Fetch and parse a dataset file.
    async fn load(&self, entry: &DatasetEntry) -> Result<Dataset> {
        let text = self.load_text(&entry.file_name).await?;
        let dataset = parse_csv(&text)?;
        info!(
            "Loaded '{}' from {}: {} records, {} columns",
            entry.label,
            self.describe(),
            dataset.len(),
            dataset.headers.len()
        );
        Ok(dataset)
    }
}

/// Rejects names that could escape the data directory or URL base.
fn check_file_name(file_name: &str) -> Result<()> {
    if file_name.is_empty()
        || file_name.contains('/')
        || file_name.contains('\\')
        || file_name.contains("..")
    {
        return Err(ConnectorError::NotFound(file_name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Local directory
// ---------------------------------------------------------------------------

/// Datasets stored as `*_data.csv` files in one directory.
pub struct LocalSource {
    dir: PathBuf,
}

impl LocalSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DatasetSource for LocalSource {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    async fn catalog(&self) -> Result<Catalog> {
        let catalog = scan_directory(&self.dir).await?;
        debug!("Found {} datasets in {:?}", catalog.len(), self.dir);
        Ok(catalog)
    }

    async fn load_text(&self, file_name: &str) -> Result<String> {
        check_file_name(file_name)?;
        let path = self.dir.join(file_name);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ConnectorError::NotFound(file_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Remote mirror
// ---------------------------------------------------------------------------

/// Datasets served over HTTP from a base URL (e.g. a CDN mirror of the data
/// directory). The catalog is read from `<base>/locations.json`.
pub struct RemoteSource {
    base: Url,
    http: reqwest::Client,
}

impl RemoteSource {
    pub fn new(base_url: &str) -> Result<Self> {
        // Url::join drops the last path segment unless the base ends in '/'.
        let base = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };
        Ok(Self {
            base,
            http: reqwest::Client::new(),
        })
    }

    pub fn url_for(&self, file_name: &str) -> Result<Url> {
        check_file_name(file_name)?;
        Ok(self.base.join(file_name)?)
    }

    async fn get_text(&self, file_name: &str) -> Result<String> {
        let url = self.url_for(file_name)?;
        debug!("Fetching {}", url);
        let response = self.http.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ConnectorError::NotFound(file_name.to_string()));
        }
        Ok(response.error_for_status()?.text().await?)
    }
}

#[async_trait]
impl DatasetSource for RemoteSource {
    fn describe(&self) -> String {
        self.base.to_string()
    }

    async fn catalog(&self) -> Result<Catalog> {
        let text = self.get_text(CATALOG_FILE).await?;
        let listed: Catalog = serde_json::from_str(&text)?;
        // Re-derive entries so labels and ordering match a local scan.
        Ok(build_catalog(listed.locations.iter().map(|e| e.file_name.as_str())))
    }

    async fn load_text(&self, file_name: &str) -> Result<String> {
        self.get_text(file_name).await
    }
}

/// The configured base URL, trimmed, or `None` when unset or blank.
pub fn remote_base_url(base_url: Option<&str>) -> Option<&str> {
    base_url.map(str::trim).filter(|url| !url.is_empty())
}

/// Pick a source: a remote base URL wins over the local directory.
pub fn source_from_config(data_dir: impl Into<PathBuf>, base_url: Option<&str>) -> Result<Arc<dyn DatasetSource>> {
    match remote_base_url(base_url) {
        Some(url) => Ok(Arc::new(RemoteSource::new(url)?)),
        None => Ok(Arc::new(LocalSource::new(data_dir))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_file_name_rejects_traversal() {
        assert!(check_file_name("marina_data.csv").is_ok());
        assert!(check_file_name("../secret_data.csv").is_err());
        assert!(check_file_name("sub/marina_data.csv").is_err());
        assert!(check_file_name("").is_err());
    }

    #[test]
    fn test_remote_url_for_keeps_base_path() {
        let src = RemoteSource::new("https://cdn.example.com/gh/org/data@main/public/data").unwrap();
        assert_eq!(
            src.url_for("marina_data.csv").unwrap().as_str(),
            "https://cdn.example.com/gh/org/data@main/public/data/marina_data.csv"
        );
    }

    #[test]
    fn test_remote_rejects_bad_base() {
        assert!(matches!(
            RemoteSource::new("not a url"),
            Err(ConnectorError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_remote_base_url_ignores_blank() {
        assert_eq!(remote_base_url(None), None);
        assert_eq!(remote_base_url(Some("")), None);
        assert_eq!(remote_base_url(Some("   ")), None);
        assert_eq!(
            remote_base_url(Some(" https://cdn.example.com/data ")),
            Some("https://cdn.example.com/data")
        );
    }

    #[test]
    fn test_source_from_config() {
        let local = source_from_config("./public/data", None).unwrap();
        assert_eq!(local.describe(), "./public/data");
        let blank = source_from_config("./data", Some("  ")).unwrap();
        assert_eq!(blank.describe(), "./data");
        let remote = source_from_config("./data", Some("https://cdn.example.com/data")).unwrap();
        assert_eq!(remote.describe(), "https://cdn.example.com/data/");
    }

    #[tokio::test]
    async fn test_local_source_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("dubai_marina_data.csv"),
            "name,building\nAli,Tower A\n,\n",
        )
        .unwrap();

        let src = LocalSource::new(dir.path());
        let catalog = src.catalog().await.unwrap();
        let entry = catalog.get("dubai_marina").unwrap();
        assert_eq!(entry.label, "Dubai Marina");

        let ds = src.load(entry).await.unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[tokio::test]
    async fn test_local_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = LocalSource::new(dir.path());
        let err = src.load_text("gone_data.csv").await.unwrap_err();
        assert!(matches!(err, ConnectorError::NotFound(_)));
    }
}
