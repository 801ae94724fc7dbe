mod builder;
mod cache;
mod error;
mod fetcher;
mod models;
mod parser;
mod source;

pub use builder::{
    build_track, track_id_for_source, TrackDefaults, DEFAULT_ALBUM_ART_URL, DEFAULT_PLACEHOLDER,
};
pub use cache::CatalogCache;
pub use error::CatalogError;
pub use fetcher::CatalogFetcher;
pub use models::{CatalogState, SearchField, Track, TrackEntry};
pub use parser::{parse_records, RawTrackRecord};
pub use source::{AssetCatalogSource, CatalogSource, HttpCatalogSource};
