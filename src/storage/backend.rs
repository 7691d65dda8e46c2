//! Key-value store abstraction.
//!
//! This module defines the [`KeyValueStore`] trait the router, the handlers and
//! the timer store are written against. Values are JSON documents; an entry may
//! carry an expiry, after which it reads as absent. The store is the sole source
//! of truth between invocations, so implementations must not serve a value that
//! diverges from what is persisted.

use crate::domain::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Abstraction over persistent key-value backends.
///
/// # Implementations
///
/// - [`JsonStore`](crate::storage::JsonStore): one JSON file, atomic writes
/// - [`MemoryStore`](crate::storage::MemoryStore): in-process map
///
/// # Examples
///
/// ```
/// use jiraflow::storage::{KeyValueStore, MemoryStore};
/// use serde_json::json;
///
/// let store = MemoryStore::new();
/// store.set("PROJ-1-assign", json!({"currentAssignee": "alice"}), None)?;
/// assert!(store.get("PROJ-1-assign")?.is_some());
/// store.delete("PROJ-1-assign")?;
/// assert!(store.get("PROJ-1-assign")?.is_none());
/// # Ok::<(), jiraflow::JiraflowError>(())
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent or expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// With `ttl`, the entry reads as absent once the duration has elapsed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn delete(&self, key: &str) -> Result<()>;

    /// Removes every entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn clear(&self) -> Result<()>;

    /// Lists the keys of all live (non-expired) entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Reads and deserializes the value stored under `key`.
///
/// # Errors
///
/// Returns an error if the backend cannot be read or the stored value does not
/// deserialize into `T`.
pub fn get_typed<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    store
        .get(key)?
        .map(serde_json::from_value)
        .transpose()
        .map_err(Into::into)
}

/// Serializes `value` and stores it under `key`.
///
/// # Errors
///
/// Returns an error if serialization fails or the backend cannot be written.
pub fn set_typed<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
    ttl: Option<Duration>,
) -> Result<()> {
    store.set(key, serde_json::to_value(value)?, ttl)
}
