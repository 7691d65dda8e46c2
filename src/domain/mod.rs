//! Domain layer for jiraflow.
//!
//! Core types independent of the launcher output format and of the Jira wire
//! format.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`ticket`]: Tickets, users, transitions and issue types

pub mod error;
pub mod ticket;

pub use error::{JiraflowError, Result};
pub use ticket::{format_elapsed, project_icon, project_of, IssueType, Ticket, Transition, User};
