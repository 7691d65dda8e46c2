//! Remote issue tracker access.
//!
//! The handlers only ever talk to the [`IssueTracker`] trait; [`JiraClient`] is
//! the production implementation over the Jira REST API. Every method returns a
//! boxed future so the trait stays object safe and independent calls can be
//! issued together and joined.
//!
//! # Modules
//!
//! - [`client`]: `reqwest`-based REST client
//! - `wire`: response and request bodies of the REST API

pub mod client;
mod wire;

pub use client::JiraClient;

use crate::domain::{IssueType, Result, Ticket, Transition, User};
use futures_util::future::BoxFuture;

/// Operations the workflow needs from the remote tracker.
///
/// All calls are fallible network calls; failures surface as
/// [`JiraflowError::Network`](crate::JiraflowError::Network), or as
/// [`JiraflowError::Configuration`](crate::JiraflowError::Configuration) when the
/// tracker rejects the credentials. Implementations never retry.
pub trait IssueTracker: Send + Sync {
    /// Lists the tickets matching a JQL filter.
    fn list_tickets<'a>(&'a self, jql: &'a str) -> BoxFuture<'a, Result<Vec<Ticket>>>;

    /// Free-text search across tickets.
    fn search<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<Ticket>>>;

    /// Lists users tickets can be assigned to.
    fn list_users(&self) -> BoxFuture<'_, Result<Vec<User>>>;

    /// Lists the transitions currently available on a ticket.
    fn transitions<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Vec<Transition>>>;

    /// Moves a ticket through a transition.
    fn transition<'a>(&'a self, key: &'a str, transition_id: &'a str)
        -> BoxFuture<'a, Result<()>>;

    /// Assigns a ticket to a user.
    fn assign<'a>(&'a self, key: &'a str, username: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Adds a comment to a ticket.
    fn comment<'a>(&'a self, key: &'a str, body: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Lists the issue types that can be created.
    fn issue_types(&self) -> BoxFuture<'_, Result<Vec<IssueType>>>;

    /// Logs `seconds` of work against a ticket.
    fn add_worklog<'a>(&'a self, key: &'a str, seconds: u64) -> BoxFuture<'a, Result<()>>;

    /// Adds the logged-in user to a ticket's watchers.
    fn watch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Removes the logged-in user from a ticket's watchers.
    fn unwatch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>>;
}
