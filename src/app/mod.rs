//! Application layer: routing queries to menus and running commands.
//!
//! This module sits between the binary (main.rs) and the domain, storage and
//! Jira layers. A process does exactly one of two things: answer a query with a
//! result document, or run the command attached to a selected entry.
//!
//! # Architecture
//!
//! ```text
//! query → path decode → Router::classify → handler → Feedback → JSON
//!                                             │
//!                                             └─ Flow::Redirect ─┐
//!                                                ↑               │
//!                                                └───────────────┘
//!
//! --run "<command>" → Command::from_str → executor::execute → notification
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side-effect commands carried by selectable entries
//! - [`bookmarks`]: Bookmark ticket lists and their TTL cache
//! - [`executor`]: Performs a parsed command
//! - [`handlers`]: One handler per menu
//! - [`path`]: The `a › b › filter` query codec
//! - [`registry`]: Handler lookup by action name
//! - [`router`]: Ordered classification rules and dispatch
//! - [`workflow`]: Per-invocation context
//!
//! # Example
//!
//! ```rust
//! use jiraflow::app::path::{path, NavigationContext};
//!
//! let query = format!("{}al", path(&["assign", "PROJ-12"]));
//! let nav = NavigationContext::parse(&query);
//! assert_eq!(nav.context(), Some("PROJ-12"));
//! assert_eq!(nav.filter(), "al");
//! ```

pub mod actions;
pub mod bookmarks;
pub mod executor;
pub mod handlers;
pub mod path;
pub mod registry;
pub mod router;
pub mod workflow;

pub use actions::Command;
pub use registry::{Flow, Handler, Registry};
pub use router::{Router, MAIN_MENU};
pub use workflow::Workflow;
