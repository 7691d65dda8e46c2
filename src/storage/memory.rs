//! In-process key-value store.
//!
//! Backs the session store when no cache directory is available and stands in
//! for the JSON store in tests.

use crate::domain::error::{JiraflowError, Result};
use crate::storage::backend::KeyValueStore;
use crate::storage::json::StoredEntry;
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Map-backed store with the same expiry semantics as [`JsonStore`](super::JsonStore).
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, StoredEntry>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, BTreeMap<String, StoredEntry>>> {
        self.entries
            .lock()
            .map_err(|e| JiraflowError::Persistence(format!("store lock poisoned: {e}")))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let now = Utc::now().timestamp();
        Ok(self
            .entries()?
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<()> {
        self.entries()?
            .insert(key.to_string(), StoredEntry::new(value, ttl));
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries()?.clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let now = Utc::now().timestamp();
        Ok(self
            .entries()?
            .iter()
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect())
    }
}
