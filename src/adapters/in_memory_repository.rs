//! In-memory repository for testing.
//!
//! Pure in-memory implementation of the repository port, so tests can
//! exercise persistence without touching the file system.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use serde::{Serialize, de::DeserializeOwned};

use super::corrupt;
use crate::{
    Result,
    error::Error,
    ports::Repository,
    q_learning::{TrajectoryLog, ValueTable},
};

/// In-memory repository for testing.
///
/// Entries are MessagePack-encoded bytes keyed by path. All clones share the
/// same storage.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use qttt::{adapters::InMemoryRepository, ports::Repository, q_learning::ValueTable};
///
/// let repo = InMemoryRepository::new();
/// repo.save_table(&ValueTable::new(), Path::new("q_table"))?;
/// let loaded = repo.load_table(Path::new("q_table"))?;
/// assert!(loaded.is_empty());
/// # Ok::<(), qttt::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    /// Number of stored entries.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Remove every stored entry.
    pub fn clear(&self) {
        self.storage().clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&Self::key(path))
    }

    /// Store raw bytes at `path`, bypassing encoding.
    pub fn insert_raw(&self, path: &Path, bytes: Vec<u8>) {
        self.storage().insert(Self::key(path), bytes);
    }

    fn put<T: Serialize>(&self, value: &T, path: &Path, what: &str) -> Result<()> {
        let bytes = rmp_serde::to_vec(value).map_err(|e| Error::SerializationContext {
            operation: format!("serialize {what} for in-memory storage"),
            message: e.to_string(),
        })?;
        self.insert_raw(path, bytes);
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let storage = self.storage();
        let bytes = storage.get(&Self::key(path)).ok_or_else(|| Error::Io {
            operation: format!("load from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;
        rmp_serde::from_slice(bytes).map_err(|e| corrupt(path, e))
    }
}

impl Repository for InMemoryRepository {
    fn save_table(&self, table: &ValueTable, path: &Path) -> Result<()> {
        self.put(table, path, "value table")
    }

    fn load_table(&self, path: &Path) -> Result<ValueTable> {
        self.get(path)
    }

    fn save_trajectories(&self, log: &TrajectoryLog, path: &Path) -> Result<()> {
        self.put(log, path, "trajectory log")
    }

    fn load_trajectories(&self, path: &Path) -> Result<TrajectoryLog> {
        self.get(path)
    }
}
