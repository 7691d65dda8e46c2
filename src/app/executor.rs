//! Performs the side effect attached to a selected entry.
//!
//! `jiraflow --run "<command>"` parses the command string back into a
//! [`Command`] and runs it here. The returned string is the one-line
//! notification the launcher shows afterwards.

use crate::app::bookmarks;
use crate::app::workflow::Workflow;
use crate::app::Command;
use crate::domain::{format_elapsed, JiraflowError, Result};
use crate::storage::AssignContext;
use crate::Config;
use std::path::Path;

/// Written to `config.toml` on first login so the user only fills in values.
const CONFIG_TEMPLATE: &str = r#"# jiraflow settings
url = "https://jira.example.com"
username = ""
token = ""
cache_ttl_secs = 300

[[bookmarks]]
name = "My open tickets"
jql = "assignee = currentUser() AND resolution = Unresolved ORDER BY updated DESC"
"#;

/// Runs `command`, returning the notification text.
///
/// # Errors
///
/// Returns the tracker, timer or storage error the command hit. A failed
/// `stopProgress` leaves the stopped timer in place so it can be retried.
/// When Jira rejects the credentials the token is cleared first, so the next
/// main menu offers Login.
pub async fn execute(workflow: &Workflow, command: &Command) -> Result<String> {
    tracing::info!(command = %command, "executing");

    let outcome = perform(workflow, command).await;
    if let Err(JiraflowError::Unauthorized(_)) = &outcome {
        workflow.forget_credentials()?;
    }
    outcome
}

async fn perform(workflow: &Workflow, command: &Command) -> Result<String> {
    match command {
        Command::Login => login(workflow).await,
        Command::Logout => {
            workflow.forget_credentials()?;
            bookmarks::clear_cache(workflow.data.as_ref())?;
            Ok("Logged out".to_string())
        }
        Command::OpenIssue(key) => {
            workflow.launcher.open_url(&workflow.config.browse_url(key))?;
            Ok(format!("Opened {key}"))
        }
        Command::Assign { key, username } => {
            workflow.tracker.assign(key, username).await?;
            workflow.session.delete(&AssignContext::key_for(key))?;
            bookmarks::clear_cache(workflow.data.as_ref())?;
            Ok(format!("Assigned {key} to {username}"))
        }
        Command::Comment { key, body } => {
            workflow.tracker.comment(key, body).await?;
            Ok(format!("Commented on {key}"))
        }
        Command::Watch(key) => {
            workflow.tracker.watch(key).await?;
            bookmarks::clear_cache(workflow.data.as_ref())?;
            Ok(format!("Watching {key}"))
        }
        Command::Unwatch(key) => {
            workflow.tracker.unwatch(key).await?;
            bookmarks::clear_cache(workflow.data.as_ref())?;
            Ok(format!("Stopped watching {key}"))
        }
        Command::Transition { key, transition_id } => {
            workflow.tracker.transition(key, transition_id).await?;
            bookmarks::clear_cache(workflow.data.as_ref())?;
            Ok(format!("Changed the status of {key}"))
        }
        Command::StartProgress(key) => {
            workflow.timers().start(key)?;
            Ok(format!("Started progress on {key}"))
        }
        Command::StopProgress(key) => {
            let record = workflow.timers().stop(key).await?;
            Ok(format!(
                "Logged {} on {key}",
                format_elapsed(record.accumulated_seconds)
            ))
        }
        Command::ClearProgress(key) => {
            workflow.timers().clear_progress(key)?;
            Ok(format!("Stopped progress on {key} without logging"))
        }
        Command::CreateIssue(type_id) => {
            let url = format!(
                "{}/secure/CreateIssue.jspa?issuetype={type_id}",
                workflow.config.base_url()
            );
            workflow.launcher.open_url(&url)?;
            Ok("Opened the create issue form".to_string())
        }
        Command::EditSettings => {
            let config_path = &workflow.config_path;
            ensure_config_file(config_path)?;
            workflow.launcher.open_url(&config_path.to_string_lossy())?;
            Ok("Opened settings".to_string())
        }
        Command::RefreshCache => {
            let removed = bookmarks::clear_cache(workflow.data.as_ref())?;
            workflow.launcher.spawn_refresh()?;
            tracing::debug!(removed, "cache refresh started");
            Ok("Refreshing tickets in the background".to_string())
        }
        Command::ClearCache => {
            let removed = bookmarks::clear_cache(workflow.data.as_ref())?;
            Ok(format!("Cleared {removed} cached lists"))
        }
    }
}

async fn login(workflow: &Workflow) -> Result<String> {
    if workflow.config.is_configured() {
        // Any authenticated call proves the credentials.
        workflow.tracker.issue_types().await?;
        return Ok(format!("Logged in to {}", workflow.config.base_url()));
    }

    let config_path = &workflow.config_path;
    ensure_config_file(config_path)?;
    workflow.launcher.open_url(&config_path.to_string_lossy())?;
    Ok("Fill in url, username and token in config.toml".to_string())
}

fn ensure_config_file(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        return Ok(());
    }
    tracing::info!(path = %config_path.display(), "writing config template");
    // Round-trip through Config so the template stays loadable.
    Config::from_toml(CONFIG_TEMPLATE)?;
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(config_path, CONFIG_TEMPLATE)?;
    Ok(())
}
