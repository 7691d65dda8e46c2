//! jiraflow: a launcher script filter for Jira.
//!
//! Every keystroke in the launcher runs `jiraflow "<query>"` as a fresh process.
//! The query encodes where the user is in a menu hierarchy
//! (`assign › PROJ-12 › al`); jiraflow classifies it, runs the matching
//! handler and prints one JSON result document. Selecting an entry either
//! feeds a new query back (drilling down) or runs `jiraflow --run "<command>"`
//! to perform the side effect.
//!
//! - Hierarchical autocomplete over bookmarks, search, assignment, comments,
//!   status transitions and issue creation
//! - Work timers persisted between invocations and logged as worklogs on stop
//! - Bookmark ticket lists cached with a TTL and refreshed in the background

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Entry point
//! │  query | --run <command> | --refresh                │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Path codec and router                            │
//! │  - Menu handlers                                    │
//! │  - Command executor, background refresh             │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Jira Layer    │
//! │ (ui/)         │   │ (storage/)    │   │ (jira/)       │
//! │ - Items       │   │ - JSON store  │   │ - Tracker API │
//! │ - Feedback    │   │ - Timers      │   │ - REST client │
//! │ - JSON output │   │ - TTL caches  │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Paths, clock, process launcher                   │
//! │  - Tickets, users, error types                      │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing to a rotating log file                   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Routing, handlers, commands
//! - [`domain`]: Core domain types and errors
//! - [`infrastructure`]: Paths, clock and process launching
//! - [`jira`]: Issue tracker trait and REST client
//! - [`storage`]: Key-value stores and work timers
//! - [`ui`]: Result entries and script-filter rendering
//! - [`observability`]: File-based logging
//!
//! # Configuration
//!
//! `config.toml` in the workflow data directory:
//!
//! ```toml
//! url = "https://jira.example.com"
//! username = "jdoe"
//! token = "..."
//! cache_ttl_secs = 300
//!
//! [[bookmarks]]
//! name = "My open tickets"
//! jql = "assignee = currentUser() AND resolution = Unresolved"
//! icon = "mine.png"
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod jira;
pub mod observability;
pub mod storage;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_support;

pub use app::{Command, Flow, Router, Workflow};
pub use domain::{JiraflowError, Result};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding the API token.
pub const TOKEN_ENV: &str = "JIRAFLOW_TOKEN";

/// Environment variable overriding the log level.
pub const LOG_ENV: &str = "JIRAFLOW_LOG";

/// A saved JQL filter listed on the main menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub name: String,
    pub jql: String,
    /// Icon file name; `bookmark.png` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Workflow configuration loaded from `config.toml`.
///
/// Every field has a default, so a partial or missing file loads fine; the
/// workflow then reports itself as not configured until `url`, `username` and
/// `token` are all set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Jira instance.
    pub url: String,

    pub username: String,

    /// API token or password. Overridden by `JIRAFLOW_TOKEN`.
    pub token: String,

    /// Lifetime of cached bookmark ticket lists. Default: 300
    pub cache_ttl_secs: u64,

    /// Request timeout for the REST client. Default: 10
    pub timeout_secs: u64,

    /// Log filter directive. Overridden by `JIRAFLOW_LOG`. Default: `"info"`
    pub log_level: String,

    pub bookmarks: Vec<Bookmark>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            token: String::new(),
            cache_ttl_secs: 300,
            timeout_secs: 10,
            log_level: "info".to_string(),
            bookmarks: Vec::new(),
        }
    }
}

impl Config {
    /// Parses a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`JiraflowError::Configuration`] if the document is not valid
    /// TOML or a field has the wrong type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use jiraflow::Config;
    ///
    /// let config = Config::from_toml(r#"
    ///     url = "https://jira.example.com"
    ///     username = "jdoe"
    ///     token = "secret"
    ///
    ///     [[bookmarks]]
    ///     name = "Mine"
    ///     jql = "assignee = currentUser()"
    /// "#)?;
    /// assert!(config.is_configured());
    /// assert_eq!(config.cache_ttl_secs, 300);
    /// assert_eq!(config.bookmarks.len(), 1);
    /// # Ok::<(), jiraflow::JiraflowError>(())
    /// ```
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source)
            .map_err(|e| JiraflowError::Configuration(format!("invalid config.toml: {e}")))
    }

    /// Loads the configuration file and applies environment overrides.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let config = match std::fs::read_to_string(path) {
            Ok(source) => Self::from_toml(&source)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(config.with_overrides(
            std::env::var(TOKEN_ENV).ok(),
            std::env::var(LOG_ENV).ok(),
        ))
    }

    fn with_overrides(mut self, token: Option<String>, log_level: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.token = token;
        }
        if let Some(level) = log_level.filter(|l| !l.is_empty()) {
            self.log_level = level;
        }
        self
    }

    /// Writes the configuration back to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let source = toml::to_string_pretty(self)
            .map_err(|e| JiraflowError::Configuration(format!("cannot serialize config: {e}")))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, source)?;
        Ok(())
    }

    /// Returns `true` once the tracker URL and credentials are all set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.username.is_empty() && !self.token.is_empty()
    }

    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.url.trim().trim_end_matches('/')
    }

    /// Browser URL of a ticket.
    #[must_use]
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{key}", self.base_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_document_loads_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.is_configured());
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn configured_requires_all_credentials() {
        let mut config = Config {
            url: "https://jira.example.com".into(),
            username: "jdoe".into(),
            token: "t".into(),
            ..Config::default()
        };
        assert!(config.is_configured());
        config.token.clear();
        assert!(!config.is_configured());
    }

    #[test]
    fn overrides_replace_token_and_level() {
        let config = Config::default().with_overrides(Some("env-token".into()), Some(String::new()));
        assert_eq!(config.token, "env-token");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn invalid_toml_is_a_configuration_error() {
        assert!(matches!(
            Config::from_toml("url = ["),
            Err(JiraflowError::Configuration(_))
        ));
    }

    #[test]
    fn save_then_load_keeps_bookmarks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            url: "https://jira.example.com/".into(),
            bookmarks: vec![Bookmark {
                name: "Mine".into(),
                jql: "assignee = currentUser()".into(),
                icon: None,
            }],
            ..Config::default()
        };
        config.save(&path).unwrap();

        let source = std::fs::read_to_string(&path).unwrap();
        let loaded = Config::from_toml(&source).unwrap();
        assert_eq!(loaded.bookmarks, config.bookmarks);
        assert_eq!(loaded.browse_url("PROJ-1"), "https://jira.example.com/browse/PROJ-1");
    }
}
