//! Conversion of raw records into catalog tracks.

use super::{RawTrackRecord, Track};
use sha2::{Digest, Sha256};

pub const DEFAULT_PLACEHOLDER: &str = "Unknown";
pub const DEFAULT_ALBUM_ART_URL: &str =
    "http://creativeherald.com/wp-content/uploads/2012/07/music-note-logo-500x625.jpg";

/// Values used for attributes the catalog document does not carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDefaults {
    pub genre: String,
    pub artist: String,
    pub album: String,
    pub album_art_url: String,
}

impl TrackDefaults {
    /// Same placeholder for genre, artist and album.
    pub fn with_placeholder(placeholder: &str, album_art_url: &str) -> Self {
        Self {
            genre: placeholder.to_string(),
            artist: placeholder.to_string(),
            album: placeholder.to_string(),
            album_art_url: album_art_url.to_string(),
        }
    }
}

impl Default for TrackDefaults {
    fn default() -> Self {
        Self::with_placeholder(DEFAULT_PLACEHOLDER, DEFAULT_ALBUM_ART_URL)
    }
}

/// Stable track id for a source URL: the first 16 bytes of its SHA-256,
/// hex encoded.
pub fn track_id_for_source(source_url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source_url.as_bytes());
    let digest = hasher.finalize();
    digest[..16].iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn build_track(record: RawTrackRecord, defaults: &TrackDefaults) -> Track {
    Track {
        id: track_id_for_source(&record.url),
        title: record.name,
        source_url: record.url,
        genre: defaults.genre.clone(),
        artist: defaults.artist.clone(),
        album: defaults.album.clone(),
        album_art_url: defaults.album_art_url.clone(),
        track_number: record.size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, url: &str, size: i64) -> RawTrackRecord {
        RawTrackRecord {
            name: name.to_string(),
            url: url.to_string(),
            size,
        }
    }

    #[test]
    fn test_same_url_same_id() {
        let a = build_track(record("A", "http://x/1.mp3", 1), &TrackDefaults::default());
        let b = build_track(record("B", "http://x/1.mp3", 2), &TrackDefaults::default());
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_different_url_different_id() {
        let a = track_id_for_source("http://x/1.mp3");
        let b = track_id_for_source("http://x/2.mp3");
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_id_is_digest_prefix() {
        assert_eq!(track_id_for_source(""), "e3b0c44298fc1c149afbf4c8996fb924");
    }

    #[test]
    fn test_fills_placeholders() {
        let track = build_track(record("Sunrise", "http://x/1.mp3", 42), &TrackDefaults::default());

        assert_eq!(track.title, "Sunrise");
        assert_eq!(track.source_url, "http://x/1.mp3");
        assert_eq!(track.genre, DEFAULT_PLACEHOLDER);
        assert_eq!(track.artist, DEFAULT_PLACEHOLDER);
        assert_eq!(track.album, DEFAULT_PLACEHOLDER);
        assert_eq!(track.album_art_url, DEFAULT_ALBUM_ART_URL);
        assert_eq!(track.track_number, 42);
    }

    #[test]
    fn test_custom_defaults() {
        let defaults = TrackDefaults::with_placeholder("n/a", "http://img/cover.png");
        let track = build_track(record("t", "http://x/1.mp3", 0), &defaults);
        assert_eq!(track.genre, "n/a");
        assert_eq!(track.album_art_url, "http://img/cover.png");
    }
}
