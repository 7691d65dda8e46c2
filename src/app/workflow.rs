//! Per-invocation context handed to every handler.
//!
//! There is no global state: the binary builds one [`Workflow`] per process
//! and the router passes it by `&mut` to the handler it dispatches to. Tests
//! build it over in-memory stores and fakes.

use crate::domain::Result;
use crate::infrastructure::{Clock, Launcher};
use crate::jira::IssueTracker;
use crate::storage::{KeyValueStore, TimerStore};
use crate::ui::Feedback;
use crate::Config;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a handler may touch during one invocation.
pub struct Workflow {
    pub config: Config,

    /// Where `config` was loaded from; login, logout and settings write it.
    pub config_path: PathBuf,

    /// Remote tracker.
    pub tracker: Arc<dyn IssueTracker>,

    /// Persistent store: work timers and bookmark caches.
    pub data: Arc<dyn KeyValueStore>,

    /// Ephemeral navigation state, cleared whenever the bare main menu shows.
    pub session: Arc<dyn KeyValueStore>,

    /// Result accumulator for this invocation.
    pub feedback: Feedback,

    pub launcher: Arc<dyn Launcher>,

    pub clock: Arc<dyn Clock>,
}

impl Workflow {
    /// Timer operations over the data store.
    #[must_use]
    pub fn timers(&self) -> TimerStore<'_> {
        TimerStore::new(self.data.as_ref(), self.tracker.as_ref(), self.clock.as_ref())
    }

    /// Clears the saved token so the next invocation is not configured and
    /// the main menu offers Login. URL, username and bookmarks are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn forget_credentials(&self) -> Result<()> {
        let mut config = self.config.clone();
        config.token.clear();
        config.save(&self.config_path)?;
        tracing::info!(path = %self.config_path.display(), "token cleared");
        Ok(())
    }
}

impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("url", &self.config.url)
            .field("configured", &self.config.is_configured())
            .field("feedback", &self.feedback)
            .finish_non_exhaustive()
    }
}
