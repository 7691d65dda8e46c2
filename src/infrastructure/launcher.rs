//! Process-level side effects: background refresh and opening URLs.

use crate::domain::error::Result;
use std::process::{Command, Stdio};

/// Side effects that leave the current process.
pub trait Launcher: Send + Sync {
    /// Starts a detached `--refresh` run of this binary. Does not wait for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the process could not be spawned.
    fn spawn_refresh(&self) -> Result<()>;

    /// Opens `url` in the default browser.
    ///
    /// # Errors
    ///
    /// Returns an error if no opener could be launched.
    fn open_url(&self, url: &str) -> Result<()>;
}

/// Launches real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn spawn_refresh(&self) -> Result<()> {
        let exe = std::env::current_exe()?;
        let child = Command::new(exe)
            .arg("--refresh")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        tracing::debug!(pid = child.id(), "spawned background refresh");
        Ok(())
    }

    fn open_url(&self, url: &str) -> Result<()> {
        tracing::debug!(url = %url, "opening url");
        open::that_detached(url)?;
        Ok(())
    }
}
