mod file_config;

pub use file_config::{FileConfig, TrackDefaultsConfig};

use crate::assets::DirAssetLoader;
use crate::catalog::{
    AssetCatalogSource, CatalogSource, HttpCatalogSource, TrackDefaults, DEFAULT_ALBUM_ART_URL,
    DEFAULT_PLACEHOLDER,
};
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_ASSET_NAME: &str = "data.json";
pub const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 30;
pub const DEFAULT_READY_TIMEOUT_SEC: u64 = 60;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub endpoint_url: Option<String>,
    pub asset_dir: Option<PathBuf>,
    pub asset_name: Option<String>,
    pub request_timeout_sec: u64,
    pub ready_timeout_sec: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            asset_dir: None,
            asset_name: None,
            request_timeout_sec: DEFAULT_REQUEST_TIMEOUT_SEC,
            ready_timeout_sec: DEFAULT_READY_TIMEOUT_SEC,
        }
    }
}

/// Where the catalog document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSettings {
    Http { url: String, timeout_sec: u64 },
    Asset { dir: PathBuf, name: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: SourceSettings,
    pub ready_timeout_sec: u64,
    pub track_defaults: TrackDefaults,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let endpoint_url = file.endpoint_url.or_else(|| cli.endpoint_url.clone());
        let asset_dir = file.asset_dir.or_else(|| cli.asset_dir.clone());
        let asset_name = file
            .asset_name
            .or_else(|| cli.asset_name.clone())
            .unwrap_or_else(|| DEFAULT_ASSET_NAME.to_string());

        let request_timeout_sec = file.request_timeout_sec.unwrap_or(cli.request_timeout_sec);
        let ready_timeout_sec = file.ready_timeout_sec.unwrap_or(cli.ready_timeout_sec);
        if request_timeout_sec == 0 {
            bail!("request_timeout_sec must be greater than zero");
        }
        if ready_timeout_sec == 0 {
            bail!("ready_timeout_sec must be greater than zero");
        }

        let source = match (endpoint_url, asset_dir) {
            (Some(url), None) => {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    bail!("endpoint_url must be an http(s) URL: {}", url);
                }
                SourceSettings::Http {
                    url,
                    timeout_sec: request_timeout_sec,
                }
            }
            (None, Some(dir)) => {
                if !dir.is_dir() {
                    bail!("asset_dir is not a directory: {:?}", dir);
                }
                SourceSettings::Asset {
                    dir,
                    name: asset_name,
                }
            }
            (Some(_), Some(_)) => {
                bail!("Only one of endpoint_url and asset_dir can be specified")
            }
            (None, None) => {
                bail!("A catalog source must be specified via --endpoint or --asset-dir, or in config file")
            }
        };

        let defaults_file = file.track_defaults.unwrap_or_default();
        let track_defaults = TrackDefaults::with_placeholder(
            defaults_file
                .placeholder
                .as_deref()
                .unwrap_or(DEFAULT_PLACEHOLDER),
            defaults_file
                .album_art_url
                .as_deref()
                .unwrap_or(DEFAULT_ALBUM_ART_URL),
        );

        Ok(Self {
            source,
            ready_timeout_sec,
            track_defaults,
        })
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_sec)
    }

    /// Builds the catalog source described by this config.
    pub fn catalog_source(&self) -> Result<Arc<dyn CatalogSource>> {
        let source: Arc<dyn CatalogSource> = match &self.source {
            SourceSettings::Http { url, timeout_sec } => {
                Arc::new(HttpCatalogSource::new(url.clone(), *timeout_sec)?)
            }
            SourceSettings::Asset { dir, name } => Arc::new(AssetCatalogSource::new(
                Arc::new(DirAssetLoader::new(dir)),
                name.clone(),
            )),
        };
        Ok(source)
    }
}
