//! Filesystem collaborator boundary for artifact retrieval.
//!
//! The cache never touches `std::fs` directly; it goes through the
//! [`FileSystem`] trait so callers can back it with the real filesystem, an
//! in-memory map, or an archive reader. Implementations backed by a shared
//! non-thread-safe handle (a zip reader, say) must serialize access
//! internally, since the core invokes the trait from multiple threads.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Narrow read-only view of an artifact store.
pub trait FileSystem: Send + Sync {
    /// Whether an artifact exists at `path`.
    fn file_exists(&self, path: &Path) -> bool;

    /// Read the artifact at `path` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O or permission error.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Read the artifact at `path` as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O or permission error.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Length of the artifact at `path` in bytes.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O or permission error.
    fn file_len(&self, path: &Path) -> io::Result<u64>;
}

/// The real local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn file_exists(&self, path: &Path) -> bool {
        return path.is_file();
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        return std::fs::read_to_string(path);
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        return std::fs::read(path);
    }

    fn file_len(&self, path: &Path) -> io::Result<u64> {
        return Ok(std::fs::metadata(path)?.len());
    }
}

/// In-memory artifact store. All access runs under one mutex, the same
/// exclusive-handle contract an archive-backed reader requires, so it doubles
/// as a stand-in for such collaborators in tests.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    /// An empty store.
    pub fn new() -> Self {
        return Self::default();
    }

    /// Add or replace an artifact.
    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.lock().insert(path.into(), text.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, String>> {
        return self.files.lock().unwrap_or_else(PoisonError::into_inner);
    }
}

impl FileSystem for MemoryFileSystem {
    fn file_exists(&self, path: &Path) -> bool {
        return self.lock().contains_key(path);
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        return self
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| return io::Error::from(io::ErrorKind::NotFound));
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        return Ok(self.read_to_string(path)?.into_bytes());
    }

    fn file_len(&self, path: &Path) -> io::Result<u64> {
        let len = self.read_to_string(path)?.len();
        return Ok(u64::try_from(len).unwrap_or(u64::MAX));
    }
}

/// Collapse `.` and `..` components in a path without touching the
/// filesystem. Preserves leading `..` when there is nothing left to pop.
/// Cache keys are normalized with this so `a/./b` and `a/b` share an entry.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                let can_pop = matches!(
                    components.last(),
                    Some(c) if !matches!(c, Component::ParentDir)
                );
                if can_pop {
                    components.pop();
                } else {
                    components.push(component);
                }
            },
            other => components.push(other),
        }
    }
    return components.iter().collect();
}
