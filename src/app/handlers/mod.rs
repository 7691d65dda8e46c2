//! One handler per menu.
//!
//! Each handler receives the raw query, decodes the path it cares about and
//! fills the workflow's feedback. The router emits once the chain of
//! redirects settles; only the main menu emits early, to clear the session
//! after the document is out.

pub mod assign;
pub mod comment;
pub mod create;
mod format;
pub mod issue;
pub mod main_menu;
pub mod progress;
pub mod search;
pub mod settings;
pub mod status;
pub mod tickets;

pub use format::format_tickets;

/// Case-insensitive substring match; an empty filter matches everything.
#[must_use]
pub fn matches_filter(text: &str, filter: &str) -> bool {
    let filter = filter.trim();
    filter.is_empty() || text.to_lowercase().contains(&filter.to_lowercase())
}
