//! In-memory catalog cache.
//!
//! The cache starts empty and is populated at most once by
//! [`CatalogCache::ensure_ready`]. Tracks are indexed by id and grouped by
//! genre. Both indexes live in a single [`CatalogIndex`] which is built off to
//! the side and swapped in under the write lock together with the transition
//! to [`CatalogState::Ready`], so readers never see a half built catalog.

use super::fetcher::CatalogFetcher;
use super::{CatalogError, CatalogState, SearchField, Track, TrackEntry};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Outcome of one initialization attempt, `None` while it is still running.
type InitOutcome = Option<Result<(), CatalogError>>;

enum InitState {
    Uninitialized,
    /// Every caller waiting on the in-flight fetch clones this receiver.
    Initializing(watch::Receiver<InitOutcome>),
    Ready,
}

/// Committed catalog content.
#[derive(Default)]
struct CatalogIndex {
    /// Entries in the order their id first appeared in the fetched document.
    entries: Vec<TrackEntry>,
    positions: HashMap<String, usize>,
    /// Genre to positions in `entries`, derived from `entries`.
    by_genre: BTreeMap<String, Vec<usize>>,
}

impl CatalogIndex {
    fn build(tracks: Vec<Track>) -> Self {
        let mut index = CatalogIndex::default();
        for track in tracks {
            match index.positions.get(&track.id) {
                Some(&position) => {
                    debug!("Duplicate track id {}, keeping the latest record", track.id);
                    index.entries[position].replace(track);
                }
                None => {
                    let entry = TrackEntry::new(track);
                    index
                        .positions
                        .insert(entry.id().to_string(), index.entries.len());
                    index.entries.push(entry);
                }
            }
        }
        index.by_genre = index.group_by_genre();
        index
    }

    fn group_by_genre(&self) -> BTreeMap<String, Vec<usize>> {
        let mut by_genre: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (position, entry) in self.entries.iter().enumerate() {
            by_genre
                .entry(entry.track().genre.clone())
                .or_default()
                .push(position);
        }
        by_genre
    }

    fn entry(&self, id: &str) -> Option<&TrackEntry> {
        self.positions.get(id).map(|&position| &self.entries[position])
    }
}

struct CatalogShared {
    state: InitState,
    index: CatalogIndex,
}

/// The initializing task was dropped without publishing, e.g. because the
/// runtime it was spawned on shut down.
fn is_abandoned(rx: &watch::Receiver<InitOutcome>) -> bool {
    rx.has_changed().is_err()
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Lazily populated, concurrency safe catalog of tracks.
///
/// Cloning is cheap, clones share the same catalog and favorites.
/// [`ensure_ready`](Self::ensure_ready) spawns the fetch on the current tokio
/// runtime.
#[derive(Clone)]
pub struct CatalogCache {
    fetcher: Arc<CatalogFetcher>,
    shared: Arc<RwLock<CatalogShared>>,
    favorites: Arc<RwLock<HashSet<String>>>,
}

impl CatalogCache {
    pub fn new(fetcher: Arc<CatalogFetcher>) -> Self {
        Self {
            fetcher,
            shared: Arc::new(RwLock::new(CatalogShared {
                state: InitState::Uninitialized,
                index: CatalogIndex::default(),
            })),
            favorites: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Makes sure the catalog is populated.
    ///
    /// Returns immediately once the catalog is ready. Otherwise starts a fetch,
    /// or joins the one already in flight, and waits for its outcome. A failed
    /// attempt leaves the catalog uninitialized so that the next call retries.
    pub async fn ensure_ready(&self) -> Result<(), CatalogError> {
        let mut outcome_rx = match self.begin_or_join() {
            Some(rx) => rx,
            None => return Ok(()),
        };

        let outcome = outcome_rx
            .wait_for(|outcome| outcome.is_some())
            .await
            .map_err(|_| CatalogError::Aborted("Catalog initializer went away".to_string()))?;

        match &*outcome {
            Some(result) => result.clone(),
            None => Err(CatalogError::Aborted(
                "Catalog initializer published no outcome".to_string(),
            )),
        }
    }

    /// Like [`ensure_ready`](Self::ensure_ready), but gives up waiting after
    /// `timeout`. The fetch itself keeps running for the other waiters.
    pub async fn ensure_ready_within(&self, timeout: Duration) -> Result<(), CatalogError> {
        match tokio::time::timeout(timeout, self.ensure_ready()).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Gave up waiting for the catalog after {:?}", timeout);
                Err(CatalogError::TimedOut(timeout))
            }
        }
    }

    /// Runs [`ensure_ready`](Self::ensure_ready) in the background and calls
    /// `on_ready` exactly once with whether the catalog is ready.
    pub fn ensure_ready_with_callback<F>(&self, on_ready: F) -> JoinHandle<()>
    where
        F: FnOnce(bool) + Send + 'static,
    {
        let cache = self.clone();
        tokio::spawn(async move {
            let success = match cache.ensure_ready().await {
                Ok(()) => true,
                Err(err) => {
                    debug!("Catalog not ready: {}", err);
                    false
                }
            };
            on_ready(success);
        })
    }

    /// Returns `None` if the catalog is ready, otherwise a receiver for the
    /// outcome of the current attempt, starting one if needed.
    fn begin_or_join(&self) -> Option<watch::Receiver<InitOutcome>> {
        if self.is_ready() {
            return None;
        }

        let mut shared = write_lock(&self.shared);
        if let InitState::Initializing(rx) = &shared.state {
            if !is_abandoned(rx) {
                debug!("Catalog fetch already in flight, waiting for it");
                return Some(rx.clone());
            }
            warn!("Previous catalog initialization ended without an outcome, starting over");
        }
        if matches!(shared.state, InitState::Ready) {
            return None;
        }

        let (outcome_tx, outcome_rx) = watch::channel(None);
        shared.state = InitState::Initializing(outcome_rx.clone());
        drop(shared);

        info!("Catalog initialization started");
        self.spawn_initialization(outcome_tx);
        Some(outcome_rx)
    }

    fn spawn_initialization(&self, outcome_tx: watch::Sender<InitOutcome>) {
        let fetcher = self.fetcher.clone();
        let shared = self.shared.clone();

        tokio::spawn(async move {
            // The fetch gets its own task so a panic in it still reaches us as
            // a JoinError and the state can be reverted.
            let fetched = match tokio::spawn(async move { fetcher.fetch().await }).await {
                Ok(result) => result,
                Err(join_err) => Err(CatalogError::Aborted(join_err.to_string())),
            };
            let outcome = Self::install(&shared, fetched);
            // Nobody may be waiting anymore, that is fine.
            let _ = outcome_tx.send(Some(outcome));
        });
    }

    fn install(
        shared: &RwLock<CatalogShared>,
        fetched: Result<Vec<Track>, CatalogError>,
    ) -> Result<(), CatalogError> {
        let built = fetched.and_then(|tracks| {
            if tracks.is_empty() {
                Err(CatalogError::Empty)
            } else {
                Ok(CatalogIndex::build(tracks))
            }
        });

        let mut shared = write_lock(shared);
        match built {
            Ok(index) => {
                info!(
                    "Catalog ready with {} tracks in {} genres",
                    index.entries.len(),
                    index.by_genre.len()
                );
                shared.index = index;
                shared.state = InitState::Ready;
                Ok(())
            }
            Err(err) => {
                error!("Could not retrieve the catalog: {}", err);
                shared.index = CatalogIndex::default();
                shared.state = InitState::Uninitialized;
                Err(err)
            }
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn state(&self) -> CatalogState {
        match read_lock(&self.shared).state {
            InitState::Uninitialized => CatalogState::Uninitialized,
            InitState::Initializing(ref rx) if is_abandoned(rx) => CatalogState::Uninitialized,
            InitState::Initializing(_) => CatalogState::Initializing,
            InitState::Ready => CatalogState::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == CatalogState::Ready
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All genre names, sorted. Empty unless the catalog is ready.
    pub fn genres(&self) -> Vec<String> {
        let shared = read_lock(&self.shared);
        if !matches!(shared.state, InitState::Ready) {
            return Vec::new();
        }
        shared.index.by_genre.keys().cloned().collect()
    }

    pub fn tracks_by_genre(&self, genre: &str) -> Vec<Track> {
        let shared = read_lock(&self.shared);
        if !matches!(shared.state, InitState::Ready) {
            return Vec::new();
        }
        match shared.index.by_genre.get(genre) {
            Some(positions) => positions
                .iter()
                .map(|&position| shared.index.entries[position].track().clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Every genre with its tracks, read under a single lock so the grouping
    /// is consistent with itself. Empty unless the catalog is ready.
    pub fn genre_snapshot(&self) -> BTreeMap<String, Vec<Track>> {
        let shared = read_lock(&self.shared);
        if !matches!(shared.state, InitState::Ready) {
            return BTreeMap::new();
        }
        shared
            .index
            .by_genre
            .iter()
            .map(|(genre, positions)| {
                let tracks = positions
                    .iter()
                    .map(|&position| shared.index.entries[position].track().clone())
                    .collect();
                (genre.clone(), tracks)
            })
            .collect()
    }

    /// Looks a track up in the committed catalog.
    pub fn track_by_id(&self, id: &str) -> Option<Track> {
        read_lock(&self.shared)
            .index
            .entry(id)
            .map(|entry| entry.track().clone())
    }

    /// Case insensitive substring search on one field. An empty query matches
    /// every track.
    pub fn search_by_field(&self, field: SearchField, query: &str) -> Vec<Track> {
        let shared = read_lock(&self.shared);
        if !matches!(shared.state, InitState::Ready) {
            return Vec::new();
        }
        let query = query.to_lowercase();
        shared
            .index
            .entries
            .iter()
            .map(TrackEntry::track)
            .filter(|track| track.field(field).to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    pub fn search_by_title(&self, query: &str) -> Vec<Track> {
        self.search_by_field(SearchField::Title, query)
    }

    pub fn search_by_album(&self, query: &str) -> Vec<Track> {
        self.search_by_field(SearchField::Album, query)
    }

    pub fn search_by_artist(&self, query: &str) -> Vec<Track> {
        self.search_by_field(SearchField::Artist, query)
    }

    pub fn all_tracks(&self) -> Vec<Track> {
        let shared = read_lock(&self.shared);
        if !matches!(shared.state, InitState::Ready) {
            return Vec::new();
        }
        shared
            .index
            .entries
            .iter()
            .map(|entry| entry.track().clone())
            .collect()
    }

    pub fn tracks_count(&self) -> usize {
        read_lock(&self.shared).index.entries.len()
    }

    pub fn genres_count(&self) -> usize {
        read_lock(&self.shared).index.by_genre.len()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Replaces the metadata of a known track, the id is kept.
    ///
    /// Returns false, changing nothing, if the id is unknown. A genre change
    /// rebuilds the whole genre index.
    pub fn update_track(&self, id: &str, track: Track) -> bool {
        let mut shared = write_lock(&self.shared);
        let position = match shared.index.positions.get(id) {
            Some(&position) => position,
            None => {
                debug!("Ignoring update of unknown track {}", id);
                return false;
            }
        };

        let new_genre = track.genre.clone();
        let previous = shared.index.entries[position].replace(track);

        if previous.genre != new_genre {
            debug!(
                "Track {} moved from genre {:?} to {:?}, rebuilding genre index",
                id, previous.genre, new_genre
            );
            let by_genre = shared.index.group_by_genre();
            shared.index.by_genre = by_genre;
        }
        true
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    pub fn set_favorite(&self, id: &str, favorite: bool) {
        let mut favorites = write_lock(&self.favorites);
        if favorite {
            favorites.insert(id.to_string());
        } else {
            favorites.remove(id);
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        read_lock(&self.favorites).contains(id)
    }

    /// Ids of the favorite tracks, sorted.
    pub fn favorites(&self) -> Vec<String> {
        let mut ids: Vec<String> = read_lock(&self.favorites).iter().cloned().collect();
        ids.sort();
        ids
    }
}
