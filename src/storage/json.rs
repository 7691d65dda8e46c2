//! JSON file-based key-value store.
//!
//! This module provides a simple, human-readable store using JSON serialization.
//! Writes go to a uniquely named temp file in the same directory which is then
//! renamed over the store, so readers never see a half-written file.
//!
//! Unlike a long-lived service, every operation re-reads the file: each process
//! lives for one query, and a value held in memory across two operations could
//! silently diverge from what another invocation wrote in between. Several
//! processes may run at once (a query, a `--run` and a background refresh), so
//! every read-modify-write holds an exclusive lock on a `.lock` file next to
//! the store.

use crate::domain::error::{JiraflowError, Result};
use crate::storage::backend::KeyValueStore;
use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

/// Current on-disk format version.
const STORE_VERSION: u32 = 1;

/// JSON store container format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    /// Version of the store format for future migrations.
    version: u32,

    /// All entries, keyed by store key.
    #[serde(default)]
    entries: BTreeMap<String, StoredEntry>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// A single value with its optional expiry (Unix seconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredEntry {
    pub(crate) value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) expires_at: Option<i64>,
}

impl StoredEntry {
    pub(crate) fn new(value: Value, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|ttl| {
            Utc::now()
                .timestamp()
                .saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX))
        });
        Self { value, expires_at }
    }

    pub(crate) fn is_live(&self, now: i64) -> bool {
        self.expires_at.map_or(true, |expires_at| expires_at > now)
    }
}

/// JSON file key-value store.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "entries": {
///     "in-progress:PROJ-1": {
///       "value": { "ticket_id": "PROJ-1", "started_at": "2024-05-01T09:00:00Z",
///                  "accumulated_seconds": 0, "created_at": "2024-05-01T09:00:00Z" }
///     },
///     "cache:bookmark-0": { "value": [], "expires_at": 1714554000 }
///   }
/// }
/// ```
#[derive(Debug)]
pub struct JsonStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,
}

impl JsonStore {
    /// Opens a JSON store backed by `file_path`.
    ///
    /// The file itself is created lazily on first write; parent directories are
    /// created immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use jiraflow::storage::JsonStore;
    /// use std::path::PathBuf;
    ///
    /// let store = JsonStore::new(PathBuf::from("/tmp/jiraflow/data.json"))?;
    /// # Ok::<(), jiraflow::JiraflowError>(())
    /// ```
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening JSON store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                JiraflowError::Persistence(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        Ok(Self { file_path })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Loads the store file, treating a missing file as an empty store.
    fn load(&self) -> Result<StoreData> {
        if !self.file_path.exists() {
            tracing::trace!("store file missing, using empty store");
            return Ok(StoreData::default());
        }

        let contents = std::fs::read_to_string(&self.file_path).map_err(|e| {
            JiraflowError::Persistence(format!("cannot read {}: {e}", self.file_path.display()))
        })?;
        let data: StoreData = serde_json::from_str(&contents)
            .map_err(|e| JiraflowError::Persistence(format!("failed to parse JSON: {e}")))?;

        tracing::trace!(version = data.version, entries = data.entries.len(), "loaded store");
        Ok(data)
    }

    fn directory(&self) -> &Path {
        self.file_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    /// Takes the store's write lock, blocking until other writers finish.
    ///
    /// The lock is released when the returned file is dropped.
    fn lock(&self) -> Result<File> {
        let lock_path = self.file_path.with_extension("lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| {
                JiraflowError::Persistence(format!("cannot open {}: {e}", lock_path.display()))
            })?;
        FileExt::lock_exclusive(&file).map_err(|e| {
            JiraflowError::Persistence(format!("cannot lock {}: {e}", lock_path.display()))
        })?;
        tracing::trace!(path = %lock_path.display(), "store locked");
        Ok(file)
    }

    /// Saves the store file using an atomic write. Callers hold the lock.
    fn save(&self, data: &StoreData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| JiraflowError::Persistence(format!("failed to serialize JSON: {e}")))?;

        let write_err = |e: std::io::Error| {
            JiraflowError::Persistence(format!("cannot write {}: {e}", self.file_path.display()))
        };
        let mut tmp = NamedTempFile::new_in(self.directory()).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.persist(&self.file_path).map_err(|e| write_err(e.error))?;

        tracing::trace!(entries = data.entries.len(), "store saved");
        Ok(())
    }

    /// Loads, applies `mutate`, drops expired entries and saves, all under
    /// the write lock.
    fn update(&self, mutate: impl FnOnce(&mut StoreData)) -> Result<()> {
        let _lock = self.lock()?;
        let mut data = self.load()?;
        mutate(&mut data);
        let now = Utc::now().timestamp();
        data.entries.retain(|_, entry| entry.is_live(now));
        self.save(&data)
    }
}

impl KeyValueStore for JsonStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let _span = tracing::debug_span!("json_store_get", key = %key).entered();

        let now = Utc::now().timestamp();
        let value = self
            .load()?
            .entries
            .remove(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value);

        tracing::debug!(found = value.is_some(), "lookup complete");
        Ok(value)
    }

    fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<()> {
        let _span = tracing::debug_span!("json_store_set", key = %key, ttl = ?ttl).entered();

        self.update(|data| {
            data.entries.insert(key.to_string(), StoredEntry::new(value, ttl));
        })
    }

    fn delete(&self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_store_delete", key = %key).entered();

        self.update(|data| {
            data.entries.remove(key);
        })
    }

    fn clear(&self) -> Result<()> {
        let _span = tracing::debug_span!("json_store_clear").entered();

        let _lock = self.lock()?;
        self.save(&StoreData::default())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let now = Utc::now().timestamp();
        Ok(self
            .load()?
            .entries
            .into_iter()
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, _)| key)
            .collect())
    }
}
