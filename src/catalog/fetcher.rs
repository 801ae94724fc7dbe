//! Fetch, parse and build pipeline producing the catalog tracks.

use super::builder::{build_track, TrackDefaults};
use super::parser::parse_records;
use super::source::CatalogSource;
use super::{CatalogError, Track};
use std::sync::Arc;
use tracing::{debug, info};

/// Runs one all-or-nothing fetch of the catalog.
pub struct CatalogFetcher {
    source: Arc<dyn CatalogSource>,
    defaults: TrackDefaults,
}

impl CatalogFetcher {
    pub fn new(source: Arc<dyn CatalogSource>, defaults: TrackDefaults) -> Self {
        Self { source, defaults }
    }

    /// Fetches the catalog document once and converts every record.
    ///
    /// Any failure along the way fails the whole fetch, a partial list of
    /// tracks is never returned.
    pub async fn fetch(&self) -> Result<Vec<Track>, CatalogError> {
        info!("Fetching catalog from {}", self.source.describe());
        let bytes = self.source.fetch_bytes().await?;
        debug!("Catalog document is {} bytes", bytes.len());

        let records = parse_records(&bytes)?;
        let tracks: Vec<Track> = records
            .into_iter()
            .map(|record| build_track(record, &self.defaults))
            .collect();

        info!("Fetched {} tracks", tracks.len());
        Ok(tracks)
    }
}
