//! Bounded per-path cache of file text, content hashes, and line indexes.
//!
//! One cache instance is shared by every component that needs file-derived
//! data during a run. The first access to a path reads the file exactly once;
//! the hash and line index derive lazily from the cached text. Unreadable
//! files cache as "untranslatable" (`None`) rather than failing the run.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use lru::LruCache;
use sha2::{Digest as _, Sha256};

use crate::fs::{FileSystem, normalize_path};
use crate::index::LineIndex;

/// Default number of distinct paths retained before eviction.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Content digests for one file, keyed by algorithm name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashData {
    /// Lowercase hex digests keyed by algorithm ("sha256").
    pub digests: BTreeMap<String, String>,
}

impl HashData {
    /// Digest the given text. Currently computes SHA-256 only; the map shape
    /// leaves room for additional algorithms.
    pub fn for_text(text: &str) -> Self {
        let digest = Sha256::digest(text.as_bytes());
        let mut digests = BTreeMap::new();
        digests.insert("sha256".to_string(), format!("{digest:x}"));
        return Self { digests };
    }

    /// The SHA-256 digest, if present.
    pub fn sha256(&self) -> Option<&str> {
        return self.digests.get("sha256").map(String::as_str);
    }
}

/// Everything cached for one path. Text is read eagerly on first access;
/// hash and line index populate on first request and are then shared.
struct FileEntry {
    hash: OnceLock<Option<HashData>>,
    index: OnceLock<Option<Arc<LineIndex>>>,
    text: Option<Arc<str>>,
}

impl FileEntry {
    fn from_text(text: Option<Arc<str>>) -> Self {
        return Self {
            hash: OnceLock::new(),
            index: OnceLock::new(),
            text,
        };
    }
}

/// A slot is inserted under the map lock but populated outside it, so
/// concurrent first accesses to one path block on the slot, not the cache.
type Slot = Arc<OnceLock<FileEntry>>;

/// Bounded, LRU-evicting cache of per-path file data. Shared by the region
/// resolver and snippet builder so repeated translations against the same
/// file never re-read or re-index it.
pub struct FileDataCache {
    entries: Mutex<LruCache<PathBuf, Slot>>,
    fs: Arc<dyn FileSystem>,
}

impl FileDataCache {
    /// A cache with the default capacity.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        return Self::with_capacity(fs, DEFAULT_CACHE_CAPACITY);
    }

    /// A cache retaining at most `capacity` paths; least-recently-used
    /// entries are discarded past that. A capacity of 0 is treated as 1.
    pub fn with_capacity(fs: Arc<dyn FileSystem>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        return Self {
            entries: Mutex::new(LruCache::new(capacity)),
            fs,
        };
    }

    /// The file's text, reading it at most once per cache lifetime. `None`
    /// when the file is missing or unreadable.
    pub fn text(&self, path: &Path) -> Option<Arc<str>> {
        let slot = self.entry(path);
        return slot.get().and_then(|entry| return entry.text.clone());
    }

    /// Content digests for the file, derived lazily from cached text.
    pub fn hash(&self, path: &Path) -> Option<HashData> {
        let slot = self.entry(path);
        let entry = slot.get()?;
        return entry
            .hash
            .get_or_init(|| return entry.text.as_deref().map(HashData::for_text))
            .clone();
    }

    /// The file's line index, built lazily from cached text and shared.
    pub fn line_index(&self, path: &Path) -> Option<Arc<LineIndex>> {
        let slot = self.entry(path);
        let entry = slot.get()?;
        return entry
            .index
            .get_or_init(|| {
                return entry
                    .text
                    .as_deref()
                    .map(|text| return Arc::new(LineIndex::build(text)));
            })
            .clone();
    }

    /// Seed the entry for `path` with caller-supplied text, avoiding a
    /// redundant read when the caller already holds the contents. Replaces
    /// any existing entry for the path.
    pub fn seed(&self, path: &Path, text: &str) {
        let slot: Slot = Arc::new(OnceLock::new());
        let _ = slot.set(FileEntry::from_text(Some(Arc::from(text))));
        self.lock().put(normalize_path(path), slot);
    }

    /// Discard every cached entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Get or insert the slot for a path, then populate it outside the map
    /// lock. `OnceLock::get_or_init` guarantees at-most-once population even
    /// under concurrent first access.
    fn entry(&self, path: &Path) -> Slot {
        let slot = {
            let mut entries = self.lock();
            entries
                .get_or_insert(normalize_path(path), || return Arc::new(OnceLock::new()))
                .clone()
        };
        slot.get_or_init(|| return FileEntry::from_text(self.read_text(path)));
        return slot;
    }

    fn read_text(&self, path: &Path) -> Option<Arc<str>> {
        if !self.fs.file_exists(path) {
            tracing::debug!("file does not exist, caching as untranslatable: {}", path.display());
            return None;
        }
        return match self.fs.read_to_string(path) {
            Ok(text) => Some(Arc::from(text)),
            Err(err) => {
                tracing::warn!("read failed, caching as untranslatable: {}: {err}", path.display());
                None
            },
        };
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<PathBuf, Slot>> {
        return self.entries.lock().unwrap_or_else(PoisonError::into_inner);
    }
}
