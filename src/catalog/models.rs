//! Catalog domain models.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Metadata of a single track in the catalog.
///
/// `id` is derived from `source_url` and is the primary key of the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub source_url: String,
    pub genre: String,
    pub artist: String,
    pub album: String,
    pub album_art_url: String,
    pub track_number: i64,
}

impl Track {
    /// Value of the given searchable field.
    pub fn field(&self, field: SearchField) -> &str {
        match field {
            SearchField::Title => &self.title,
            SearchField::Album => &self.album,
            SearchField::Artist => &self.artist,
        }
    }
}

/// Track fields that can be searched by substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SearchField {
    #[default]
    Title,
    Album,
    Artist,
}

/// Mutable cell holding the current value of a track.
///
/// Entries are keyed by `id` in the catalog and are never re-keyed, metadata
/// edits only swap the wrapped track.
#[derive(Clone, Debug)]
pub struct TrackEntry {
    id: String,
    track: Track,
}

impl TrackEntry {
    pub fn new(track: Track) -> Self {
        Self {
            id: track.id.clone(),
            track,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Replaces the wrapped track, keeping this entry's id.
    /// Returns the previous value.
    pub fn replace(&mut self, mut track: Track) -> Track {
        track.id = self.id.clone();
        std::mem::replace(&mut self.track, track)
    }
}

/// Lifecycle of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogState {
    Uninitialized,
    Initializing,
    Ready,
}
