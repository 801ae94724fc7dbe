//! Where the raw catalog document comes from.

use super::CatalogError;
use crate::assets::AssetLoader;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Produces the raw bytes of the catalog document, or fails.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_bytes(&self) -> Result<Vec<u8>, CatalogError>;

    /// Human readable description, used in logs.
    fn describe(&self) -> String;
}

/// Fetches the catalog document with a single HTTP GET.
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogSource {
    /// Create a new source.
    ///
    /// # Arguments
    /// * `url` - Endpoint returning the catalog document
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(url: String, timeout_sec: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_bytes(&self) -> Result<Vec<u8>, CatalogError> {
        debug!("GET {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(CatalogError::Network(format!(
                "Catalog endpoint {} returned status {}",
                self.url,
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        format!("http source {}", self.url)
    }
}

/// Reads the catalog document from a bundled asset.
pub struct AssetCatalogSource {
    loader: Arc<dyn AssetLoader>,
    asset_name: String,
}

impl AssetCatalogSource {
    pub fn new(loader: Arc<dyn AssetLoader>, asset_name: String) -> Self {
        Self { loader, asset_name }
    }
}

#[async_trait]
impl CatalogSource for AssetCatalogSource {
    async fn fetch_bytes(&self) -> Result<Vec<u8>, CatalogError> {
        self.loader
            .load_bytes(&self.asset_name)
            .await
            .map_err(|e| {
                CatalogError::Network(format!("Failed to load asset {}: {}", self.asset_name, e))
            })
    }

    fn describe(&self) -> String {
        format!("asset {}", self.asset_name)
    }
}
