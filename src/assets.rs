//! Loading of bundled asset files.

use async_trait::async_trait;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Loads the raw bytes of a named asset.
#[async_trait]
pub trait AssetLoader: Send + Sync {
    async fn load_bytes(&self, asset_name: &str) -> io::Result<Vec<u8>>;
}

/// Asset loader reading files from a root directory.
///
/// Asset names are relative paths; absolute names and names containing `..`
/// are rejected.
pub struct DirAssetLoader {
    root: PathBuf,
}

impl DirAssetLoader {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, asset_name: &str) -> io::Result<PathBuf> {
        let relative = Path::new(asset_name);
        let is_plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if asset_name.is_empty() || !is_plain {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid asset name: {:?}", asset_name),
            ));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetLoader for DirAssetLoader {
    async fn load_bytes(&self, asset_name: &str) -> io::Result<Vec<u8>> {
        let path = self.resolve(asset_name)?;
        tokio::fs::read(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_loads_file_from_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.json"), b"{\"files\": []}").unwrap();

        let loader = DirAssetLoader::new(dir.path());
        let bytes = loader.load_bytes("data.json").await.unwrap();

        assert_eq!(bytes, b"{\"files\": []}");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DirAssetLoader::new(dir.path());

        let err = loader.load_bytes("nope.json").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_rejects_escaping_names() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DirAssetLoader::new(dir.path());

        for name in ["../secret.json", "/etc/passwd", ""] {
            let err = loader.load_bytes(name).await.unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "name: {}", name);
        }
    }
}
