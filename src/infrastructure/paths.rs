//! Storage locations for the workflow.
//!
//! The launcher exports the directories it reserves for the workflow through
//! environment variables; outside the launcher the platform data and cache
//! directories are used instead.

use crate::domain::error::{JiraflowError, Result};
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable naming the persistent data directory.
pub const DATA_DIR_ENV: &str = "alfred_workflow_data";

/// Environment variable naming the volatile cache directory.
pub const CACHE_DIR_ENV: &str = "alfred_workflow_cache";

const APP_DIR: &str = "jiraflow";

/// Returns the data directory holding `config.toml`, `data.json` and the log.
///
/// # Errors
///
/// Returns [`JiraflowError::Configuration`] if neither `$alfred_workflow_data`
/// nor a platform data directory is available.
pub fn get_data_dir() -> Result<PathBuf> {
    resolve_dir(
        std::env::var_os(DATA_DIR_ENV),
        dirs::data_dir().map(|d| d.join(APP_DIR)),
    )
}

/// Returns the cache directory holding the session store.
///
/// # Errors
///
/// Returns [`JiraflowError::Configuration`] if neither `$alfred_workflow_cache`
/// nor a platform cache directory is available.
pub fn get_cache_dir() -> Result<PathBuf> {
    resolve_dir(
        std::env::var_os(CACHE_DIR_ENV),
        dirs::cache_dir().map(|d| d.join(APP_DIR)),
    )
}

/// Path of the configuration file.
///
/// # Errors
///
/// See [`get_data_dir`].
pub fn config_file() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("config.toml"))
}

/// Path of the persistent data store (timers, caches).
///
/// # Errors
///
/// See [`get_data_dir`].
pub fn data_file() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("data.json"))
}

/// Path of the session store.
///
/// # Errors
///
/// See [`get_cache_dir`].
pub fn session_file() -> Result<PathBuf> {
    Ok(get_cache_dir()?.join("session.json"))
}

fn resolve_dir(from_env: Option<OsString>, fallback: Option<PathBuf>) -> Result<PathBuf> {
    from_env
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or(fallback)
        .ok_or_else(|| JiraflowError::Configuration("no data directory available".to_string()))
}
