use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Catalog source (can override CLI)
    pub endpoint_url: Option<String>,
    /// Relative paths are taken from the directory of the config file.
    pub asset_dir: Option<PathBuf>,
    pub asset_name: Option<String>,
    pub request_timeout_sec: Option<u64>,
    pub ready_timeout_sec: Option<u64>,

    // Feature configs
    pub track_defaults: Option<TrackDefaultsConfig>,
}

/// Values filled in for attributes missing from the catalog document.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct TrackDefaultsConfig {
    /// Used for genre, artist and album.
    pub placeholder: Option<String>,
    pub album_art_url: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let mut config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        if let (Some(dir), Some(base)) = (config.asset_dir.as_mut(), path.parent()) {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        Ok(config)
    }
}
