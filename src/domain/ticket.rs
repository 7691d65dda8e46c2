//! Tracker domain models.
//!
//! These are the shapes the handlers work with, independent of the Jira wire
//! format (see `jira::wire`). Tickets are identified by their key (`PROJ-123`);
//! the project key prefix doubles as the name of the project icon.

use serde::{Deserialize, Serialize};

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: u64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: u64 = 3600;

/// A single issue as returned by a bookmark filter or a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub assignee: Option<String>,
    pub issue_type: Option<String>,
    /// Whether the logged-in user watches the ticket.
    #[serde(default)]
    pub watching: bool,
}

impl Ticket {
    /// Returns the project key prefix of the ticket (`PROJ` for `PROJ-12`).
    #[must_use]
    pub fn project(&self) -> &str {
        project_of(&self.key)
    }

    /// Icon file name used for this ticket's project.
    #[must_use]
    pub fn project_icon(&self) -> String {
        project_icon(&self.key)
    }
}

/// A user that tickets can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name, shown as the entry title and matched against the filter.
    pub name: String,
    /// Login name, passed to the tracker when assigning.
    pub username: String,
}

impl User {
    /// Icon file name derived from the display name.
    #[must_use]
    pub fn icon(&self) -> String {
        let safe: String = self
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{safe}.png")
    }
}

/// A workflow transition available on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    pub name: String,
}

/// An issue type offered by the "create" menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueType {
    pub id: String,
    pub name: String,
    pub subtask: bool,
}

/// Returns the project prefix of a ticket key.
#[must_use]
pub fn project_of(key: &str) -> &str {
    key.split_once('-').map_or(key, |(project, _)| project)
}

/// Returns the icon file name for the project a ticket key belongs to.
#[must_use]
pub fn project_icon(key: &str) -> String {
    format!("{}.png", project_of(key))
}

/// Formats a number of seconds as a compact running time.
///
/// - Less than 1 minute: "Xs"
/// - Less than 1 hour: "Xm"
/// - Otherwise: "Xh Ym"
///
/// # Examples
///
/// ```
/// use jiraflow::domain::format_elapsed;
///
/// assert_eq!(format_elapsed(42), "42s");
/// assert_eq!(format_elapsed(300), "5m");
/// assert_eq!(format_elapsed(3900), "1h 5m");
/// ```
#[must_use]
pub fn format_elapsed(seconds: u64) -> String {
    if seconds < SECONDS_PER_MINUTE {
        format!("{seconds}s")
    } else if seconds < SECONDS_PER_HOUR {
        format!("{}m", seconds / SECONDS_PER_MINUTE)
    } else {
        let hours = seconds / SECONDS_PER_HOUR;
        let mins = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
        format!("{hours}h {mins}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_prefix_of_key() {
        assert_eq!(project_of("PROJ-12"), "PROJ");
        assert_eq!(project_of("NOPREFIX"), "NOPREFIX");
        assert_eq!(project_icon("ABC-1"), "ABC.png");
    }

    #[test]
    fn user_icon_replaces_non_alphanumerics() {
        let user = User {
            name: "Jane O'Neil".to_string(),
            username: "jane".to_string(),
        };
        assert_eq!(user.icon(), "Jane_O_Neil.png");
    }

    #[test]
    fn elapsed_formatting_boundaries() {
        assert_eq!(format_elapsed(0), "0s");
        assert_eq!(format_elapsed(59), "59s");
        assert_eq!(format_elapsed(60), "1m");
        assert_eq!(format_elapsed(3599), "59m");
        assert_eq!(format_elapsed(3600), "1h 0m");
    }
}
