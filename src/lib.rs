//! Music Catalog Library
//!
//! In-memory catalog of track metadata, fetched once from a remote or bundled
//! document and served for browse, search and lookup.

pub mod assets;
pub mod catalog;
pub mod config;

// Re-export commonly used types for convenience
pub use assets::{AssetLoader, DirAssetLoader};
pub use catalog::{
    CatalogCache, CatalogError, CatalogFetcher, CatalogSource, CatalogState, SearchField, Track,
};
pub use config::{AppConfig, CliConfig, FileConfig};
