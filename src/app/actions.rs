//! Side-effect commands attached to selectable entries.
//!
//! Handlers never perform side effects while the user is still typing. A
//! selectable entry carries a [`Command`] rendered as a whitespace-separated
//! string (its `arg`); when the user activates the entry the launcher runs
//! `jiraflow --run "<command>"` and the executor parses it back.
//!
//! # Example
//!
//! ```rust
//! use jiraflow::Command;
//!
//! let command = Command::Assign {
//!     key: "PROJ-1".into(),
//!     username: "alice".into(),
//! };
//! assert_eq!(command.to_string(), "assign PROJ-1 alice");
//! assert_eq!("assign PROJ-1 alice".parse::<Command>()?, command);
//! # Ok::<(), jiraflow::JiraflowError>(())
//! ```

use crate::domain::JiraflowError;
use std::fmt;
use std::str::FromStr;

/// A side effect the executor can perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Verifies the credentials, or opens the config file to enter them.
    Login,

    /// Forgets the stored token and drops cached ticket lists.
    Logout,

    OpenIssue(String),

    Assign { key: String, username: String },

    /// Adds a comment; the body runs to the end of the command string.
    Comment { key: String, body: String },

    /// Moves a ticket through the transition with the given id.
    Transition { key: String, transition_id: String },

    StartProgress(String),

    /// Stops the timer and logs the time as a worklog.
    StopProgress(String),

    /// Discards the timer without logging.
    ClearProgress(String),

    /// Starts watching a ticket.
    Watch(String),

    Unwatch(String),

    /// Opens the create-issue form for an issue type id.
    CreateIssue(String),

    EditSettings,

    /// Drops cached ticket lists and starts a background refresh.
    RefreshCache,

    ClearCache,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("login"),
            Self::Logout => f.write_str("logout"),
            Self::OpenIssue(key) => write!(f, "openIssue {key}"),
            Self::Assign { key, username } => write!(f, "assign {key} {username}"),
            Self::Comment { key, body } => write!(f, "comment {key} {body}"),
            Self::Transition { key, transition_id } => write!(f, "transition {key} {transition_id}"),
            Self::StartProgress(key) => write!(f, "startProgress {key}"),
            Self::StopProgress(key) => write!(f, "stopProgress {key}"),
            Self::ClearProgress(key) => write!(f, "clearProgress {key}"),
            Self::Watch(key) => write!(f, "watch {key}"),
            Self::Unwatch(key) => write!(f, "unwatch {key}"),
            Self::CreateIssue(type_id) => write!(f, "createIssue {type_id}"),
            Self::EditSettings => f.write_str("editSettings"),
            Self::RefreshCache => f.write_str("refreshCache"),
            Self::ClearCache => f.write_str("clearCache"),
        }
    }
}

impl FromStr for Command {
    type Err = JiraflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || JiraflowError::InvalidCommand(s.trim().to_string());

        let s = s.trim();
        let (verb, rest) = s.split_once(char::is_whitespace).unwrap_or((s, ""));
        let rest = rest.trim_start();
        let mut args = rest.split_whitespace();
        let mut next = || args.next().map(str::to_string).ok_or_else(invalid);

        let command = match verb {
            "login" => Self::Login,
            "logout" => Self::Logout,
            "openIssue" => Self::OpenIssue(next()?),
            "assign" => Self::Assign {
                key: next()?,
                username: next()?,
            },
            "comment" => {
                let (key, body) = rest.split_once(char::is_whitespace).ok_or_else(invalid)?;
                let body = body.trim();
                if body.is_empty() {
                    return Err(invalid());
                }
                Self::Comment {
                    key: key.to_string(),
                    body: body.to_string(),
                }
            }
            "transition" => Self::Transition {
                key: next()?,
                transition_id: next()?,
            },
            "startProgress" => Self::StartProgress(next()?),
            "stopProgress" => Self::StopProgress(next()?),
            "clearProgress" => Self::ClearProgress(next()?),
            "watch" => Self::Watch(next()?),
            "unwatch" => Self::Unwatch(next()?),
            "createIssue" => Self::CreateIssue(next()?),
            "editSettings" => Self::EditSettings,
            "refreshCache" => Self::RefreshCache,
            "clearCache" => Self::ClearCache,
            _ => return Err(invalid()),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_body_keeps_inner_spacing() {
        let command: Command = "comment PROJ-1 looks good,  shipping".parse().unwrap();
        assert_eq!(
            command,
            Command::Comment {
                key: "PROJ-1".into(),
                body: "looks good,  shipping".into(),
            }
        );
    }

    #[test]
    fn display_matches_the_command_grammar() {
        assert_eq!(Command::ClearProgress("A-1".into()).to_string(), "clearProgress A-1");
        assert_eq!(
            Command::Transition {
                key: "A-1".into(),
                transition_id: "31".into()
            }
            .to_string(),
            "transition A-1 31"
        );
        assert_eq!(
            "stopProgress A-1".parse::<Command>().unwrap(),
            Command::StopProgress("A-1".into())
        );
        assert_eq!(Command::Unwatch("A-1".into()).to_string(), "unwatch A-1");
        assert_eq!("watch A-1".parse::<Command>().unwrap(), Command::Watch("A-1".into()));
    }

    #[test]
    fn malformed_commands_are_rejected() {
        for input in [
            "",
            "frobnicate",
            "assign PROJ-1",
            "comment PROJ-1",
            "openIssue",
            "watch",
        ] {
            assert!(
                matches!(input.parse::<Command>(), Err(JiraflowError::InvalidCommand(_))),
                "{input:?} should not parse"
            );
        }
    }
}
