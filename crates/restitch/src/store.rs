//! File content access for rewrite operations.
//!
//! The orchestrator never touches the filesystem directly; it goes through
//! the [`FileStore`] trait so tests can substitute canned content without
//! any global override state. [`DiskStore`] is the production
//! implementation, [`MemoryStore`] the in-memory test seam.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::RewriteError;

/// Default minimum plausible size for a rewrite target, in bytes.
///
/// Guards against patching a truncated or obviously-wrong file.
pub const DEFAULT_MIN_SOURCE_LEN: u64 = 50;

/// Read and write access to target file content.
pub trait FileStore {
    /// Reads the full content of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Io`] if the file cannot be read and
    /// [`RewriteError::SourceTooSmall`] if it fails the size guard.
    fn read(&self, path: &Utf8Path) -> Result<Vec<u8>, RewriteError>;

    /// Replaces the full content of `path` with `bytes`.
    ///
    /// No partial-write recovery is attempted; a failed write leaves the
    /// file in an indeterminate state and is fatal to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Io`] if the content cannot be written.
    fn write(&self, path: &Utf8Path, bytes: &[u8]) -> Result<(), RewriteError>;
}

/// Filesystem-backed store with a minimum-size read guard.
#[derive(Debug, Clone)]
pub struct DiskStore {
    min_source_len: u64,
}

impl Default for DiskStore {
    fn default() -> Self {
        Self {
            min_source_len: DEFAULT_MIN_SOURCE_LEN,
        }
    }
}

impl DiskStore {
    /// Creates a store with the default minimum-size guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with a custom minimum-size guard.
    #[must_use]
    pub const fn with_min_source_len(min_source_len: u64) -> Self {
        Self { min_source_len }
    }

    /// Returns the configured minimum source size in bytes.
    #[must_use]
    pub const fn min_source_len(&self) -> u64 {
        self.min_source_len
    }
}

impl FileStore for DiskStore {
    fn read(&self, path: &Utf8Path) -> Result<Vec<u8>, RewriteError> {
        let bytes = fs::read(path).map_err(|source| RewriteError::io(path, source))?;
        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        if size < self.min_source_len {
            return Err(RewriteError::source_too_small(
                path.to_owned(),
                size,
                self.min_source_len,
            ));
        }
        Ok(bytes)
    }

    fn write(&self, path: &Utf8Path, bytes: &[u8]) -> Result<(), RewriteError> {
        fs::write(path, bytes).map_err(|source| RewriteError::io(path, source))
    }
}

/// In-memory store holding canned content per path.
///
/// Reads serve from the map and writes land in the map, so a rewrite driven
/// through this store never touches disk. Uses interior mutability and is
/// not thread-safe; rewrites are one-at-a-time by design.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RefCell<HashMap<Utf8PathBuf, Vec<u8>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `path` with canned content.
    pub fn insert(&self, path: impl Into<Utf8PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.files.borrow_mut().insert(path.into(), bytes.into());
    }

    /// Returns the current content of `path`, if any.
    #[must_use]
    pub fn get(&self, path: &Utf8Path) -> Option<Vec<u8>> {
        self.files.borrow().get(path).cloned()
    }
}

impl FileStore for MemoryStore {
    fn read(&self, path: &Utf8Path) -> Result<Vec<u8>, RewriteError> {
        self.files.borrow().get(path).cloned().ok_or_else(|| {
            RewriteError::io(
                path,
                io::Error::new(io::ErrorKind::NotFound, "no canned content for path"),
            )
        })
    }

    fn write(&self, path: &Utf8Path, bytes: &[u8]) -> Result<(), RewriteError> {
        self.files.borrow_mut().insert(path.to_owned(), bytes.to_vec());
        Ok(())
    }
}
