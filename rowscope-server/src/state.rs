//! Shared server state: the dataset source plus caches of the catalog and
//! parsed datasets.

use std::collections::HashMap;
use std::sync::Arc;

use rowscope_connectors::{Catalog, ConnectorError, DatasetEntry, DatasetSource, Result};
use rowscope_core::Dataset;
use tokio::sync::{OnceCell, RwLock};
use tracing::info;

use crate::config::ServerConfig;

/// A dataset that is loaded at most once. Failed loads leave the cell empty
/// so the next request retries.
type DatasetSlot = Arc<OnceCell<Arc<Dataset>>>;

pub struct AppState {
    pub source: Arc<dyn DatasetSource>,
    pub config: ServerConfig,
    catalog: OnceCell<Catalog>,
    /// Keyed by file name. The map lock is never held across a load.
    datasets: RwLock<HashMap<String, DatasetSlot>>,
}

impl AppState {
    pub fn new(source: Arc<dyn DatasetSource>, config: ServerConfig) -> Self {
        Self {
            source,
            config,
            catalog: OnceCell::new(),
            datasets: RwLock::new(HashMap::new()),
        }
    }

    /// The dataset catalog, listed on first successful use.
    pub async fn catalog(&self) -> Result<&Catalog> {
        self.catalog
            .get_or_try_init(|| async {
                let catalog = self.source.catalog().await?;
                info!("Cached catalog of {} datasets", catalog.len());
                Ok::<_, ConnectorError>(catalog)
            })
            .await
    }

    /// Resolve `key` (value or file name) and return the parsed dataset,
    /// loading it on first use.
    pub async fn dataset(&self, key: &str) -> Result<(DatasetEntry, Arc<Dataset>)> {
        let entry = self.catalog().await?.get(key)?.clone();
        let slot = self.slot(&entry.file_name).await;

        let ds = slot
            .get_or_try_init(|| async {
                let ds = Arc::new(self.source.load(&entry).await?);
                info!("Cached dataset '{}' ({} records)", entry.value, ds.len());
                Ok::<_, ConnectorError>(ds)
            })
            .await?
            .clone();
        Ok((entry, ds))
    }

    async fn slot(&self, file_name: &str) -> DatasetSlot {
        if let Some(slot) = self.datasets.read().await.get(file_name) {
            return slot.clone();
        }
        self.datasets
            .write()
            .await
            .entry(file_name.to_string())
            .or_default()
            .clone()
    }

    /// Number of datasets fully loaded.
    pub async fn cached_count(&self) -> usize {
        self.datasets
            .read()
            .await
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }
}
