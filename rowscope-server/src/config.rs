//! Server configuration from environment variables.

use anyhow::{Context, Result};
use rowscope_core::DEFAULT_PAGE_SIZE;

pub const DEFAULT_DATA_DIR: &str = "./public/data";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
pub const DEFAULT_FILTER_OPTION_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory holding `*_data.csv` files.
    pub data_dir: String,
    /// Remote mirror of the data directory. When set, datasets are fetched
    /// over HTTP instead of read from `data_dir`.
    pub base_url: Option<String>,
    pub bind_addr: String,
    /// Page size used when a request does not name one.
    pub page_size: usize,
    /// Maximum options per filter dropdown.
    pub filter_option_limit: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            data_dir: std::env::var("ROWSCOPE_DATA_DIR")
                .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
            base_url: std::env::var("ROWSCOPE_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            bind_addr: std::env::var("ROWSCOPE_BIND_ADDR")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            page_size: std::env::var("ROWSCOPE_PAGE_SIZE")
                .unwrap_or_else(|_| DEFAULT_PAGE_SIZE.to_string())
                .parse()
                .context("Invalid ROWSCOPE_PAGE_SIZE")?,
            filter_option_limit: std::env::var("ROWSCOPE_FILTER_OPTION_LIMIT")
                .unwrap_or_else(|_| DEFAULT_FILTER_OPTION_LIMIT.to_string())
                .parse()
                .context("Invalid ROWSCOPE_FILTER_OPTION_LIMIT")?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            base_url: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            filter_option_limit: DEFAULT_FILTER_OPTION_LIMIT,
        }
    }
}
