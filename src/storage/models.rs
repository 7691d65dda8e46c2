//! Storage record models for the persistence layer.
//!
//! These are the raw documents written into the key-value stores. They are kept
//! separate from the domain types so the on-disk layout can evolve on its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key prefix under which timer records live in the data store.
pub const TIMER_KEY_PREFIX: &str = "in-progress:";

/// Key prefix under which cached bookmark ticket lists live in the data store.
pub const BOOKMARK_CACHE_PREFIX: &str = "cache:bookmark-";

/// Persisted work timer for a single ticket.
///
/// A record is "running" while `started_at` is set. Stopped records only
/// survive when their worklog could not be submitted; they keep the pending
/// time in `accumulated_seconds` until a retry succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerRecord {
    /// Ticket key the time is tracked against.
    pub ticket_id: String,

    /// Start of the live interval, `None` when stopped.
    pub started_at: Option<DateTime<Utc>>,

    /// Seconds folded in from finished intervals and not yet logged.
    pub accumulated_seconds: u64,

    /// When the record was first created; defines listing order.
    pub created_at: DateTime<Utc>,
}

impl TimerRecord {
    /// Creates a running record started at `now`.
    #[must_use]
    pub fn started(ticket_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            started_at: Some(now),
            accumulated_seconds: 0,
            created_at: now,
        }
    }

    /// Returns `true` while the live interval is open.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Accumulated seconds plus the live interval measured up to `now`.
    ///
    /// A clock that moved backwards contributes zero rather than a negative span.
    #[must_use]
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        let live = self.started_at.map_or(0, |started| {
            u64::try_from((now - started).num_seconds()).unwrap_or(0)
        });
        self.accumulated_seconds.saturating_add(live)
    }

    /// Data-store key for a ticket's timer.
    #[must_use]
    pub fn key_for(ticket_id: &str) -> String {
        format!("{TIMER_KEY_PREFIX}{ticket_id}")
    }
}

/// A timer record annotated with its elapsed time at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub record: TimerRecord,
    pub elapsed_seconds: u64,
}

/// Pending assignment context stored in the session store as `<KEY>-assign`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignContext {
    /// Display name of the ticket's current assignee, excluded from the user list.
    pub current_assignee: Option<String>,
}

impl AssignContext {
    /// Session-store key for a ticket's assignment context.
    #[must_use]
    pub fn key_for(ticket_id: &str) -> String {
        format!("{ticket_id}-assign")
    }
}
