//! Work timers persisted across invocations.
//!
//! Each ticket has at most one [`TimerRecord`], stored in the data store under
//! `in-progress:<KEY>`. Every operation reads the record fresh from the store and
//! writes it back before returning; no record is held between operations.

use crate::domain::error::{JiraflowError, Result};
use crate::infrastructure::Clock;
use crate::jira::IssueTracker;
use crate::storage::backend::{get_typed, set_typed, KeyValueStore};
use crate::storage::models::{TimerRecord, TimerSnapshot, TIMER_KEY_PREFIX};

/// Timer operations over a key-value store.
///
/// `stop` submits the worklog through the tracker; every other operation is
/// local.
pub struct TimerStore<'a> {
    store: &'a dyn KeyValueStore,
    tracker: &'a dyn IssueTracker,
    clock: &'a dyn Clock,
}

impl<'a> TimerStore<'a> {
    #[must_use]
    pub fn new(
        store: &'a dyn KeyValueStore,
        tracker: &'a dyn IssueTracker,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            store,
            tracker,
            clock,
        }
    }

    fn load(&self, ticket_id: &str) -> Result<Option<TimerRecord>> {
        get_typed(self.store, &TimerRecord::key_for(ticket_id))
    }

    fn load_existing(&self, ticket_id: &str) -> Result<TimerRecord> {
        self.load(ticket_id)?
            .ok_or_else(|| JiraflowError::NotFound(format!("no timer for {ticket_id}")))
    }

    fn save(&self, record: &TimerRecord) -> Result<()> {
        set_typed(self.store, &TimerRecord::key_for(&record.ticket_id), record, None)
    }

    /// Starts tracking time on a ticket.
    ///
    /// Starting a ticket that is already running returns the existing record
    /// untouched. A stopped record whose worklog is still pending is resumed and
    /// keeps its accumulated seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn start(&self, ticket_id: &str) -> Result<TimerRecord> {
        let _span = tracing::debug_span!("timer_start", ticket = %ticket_id).entered();

        let now = self.clock.now();
        let record = match self.load(ticket_id)? {
            Some(record) if record.is_running() => {
                tracing::debug!("timer already running");
                return Ok(record);
            }
            Some(mut record) => {
                tracing::debug!(pending = record.accumulated_seconds, "resuming stopped timer");
                record.started_at = Some(now);
                record
            }
            None => TimerRecord::started(ticket_id, now),
        };

        self.save(&record)?;
        tracing::debug!("timer started");
        Ok(record)
    }

    /// Stops the timer and logs the tracked time against the ticket.
    ///
    /// The live interval is folded into `accumulated_seconds` and persisted
    /// before the worklog is submitted. When the submission succeeds the record
    /// is removed; when it fails the stopped record is kept so the time can be
    /// logged by a later `stop`, and the submission error is returned.
    ///
    /// Returns the stopped record as it was submitted.
    ///
    /// # Errors
    ///
    /// - [`JiraflowError::NotFound`] if the ticket has no timer
    /// - the tracker's error if the worklog could not be submitted
    /// - a persistence error if the store cannot be read or written
    pub async fn stop(&self, ticket_id: &str) -> Result<TimerRecord> {
        let mut record = self.load_existing(ticket_id)?;

        record.accumulated_seconds = record.elapsed_seconds(self.clock.now());
        record.started_at = None;
        self.save(&record)?;

        tracing::debug!(
            ticket = %ticket_id,
            seconds = record.accumulated_seconds,
            "timer stopped, submitting worklog"
        );

        if record.accumulated_seconds > 0 {
            if let Err(e) = self
                .tracker
                .add_worklog(ticket_id, record.accumulated_seconds)
                .await
            {
                tracing::warn!(ticket = %ticket_id, error = %e, "worklog submission failed, keeping timer");
                return Err(e);
            }
        }

        self.store.delete(&TimerRecord::key_for(ticket_id))?;
        tracing::debug!(ticket = %ticket_id, "worklog submitted");
        Ok(record)
    }

    /// Discards a ticket's timer without logging any time. No-op if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear_progress(&self, ticket_id: &str) -> Result<()> {
        tracing::debug!(ticket = %ticket_id, "clearing timer");
        self.store.delete(&TimerRecord::key_for(ticket_id))
    }

    /// Accumulated seconds plus the live interval if running.
    ///
    /// # Errors
    ///
    /// - [`JiraflowError::NotFound`] if the ticket has no timer
    /// - a persistence error if the store cannot be read
    pub fn elapsed_seconds(&self, ticket_id: &str) -> Result<u64> {
        Ok(self
            .load_existing(ticket_id)?
            .elapsed_seconds(self.clock.now()))
    }

    /// Returns a ticket's timer with its live elapsed time.
    ///
    /// # Errors
    ///
    /// - [`JiraflowError::NotFound`] if the ticket has no timer
    /// - a persistence error if the store cannot be read
    pub fn info(&self, ticket_id: &str) -> Result<TimerSnapshot> {
        let record = self.load_existing(ticket_id)?;
        let elapsed_seconds = record.elapsed_seconds(self.clock.now());
        Ok(TimerSnapshot {
            record,
            elapsed_seconds,
        })
    }

    /// Lists every tracked timer, running or stopped, in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or a record is malformed.
    pub fn list_all(&self) -> Result<Vec<TimerSnapshot>> {
        let now = self.clock.now();

        let mut records = Vec::new();
        for key in self.store.keys()? {
            if !key.starts_with(TIMER_KEY_PREFIX) {
                continue;
            }
            if let Some(record) = get_typed::<TimerRecord>(self.store, &key)? {
                records.push(record);
            }
        }

        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.ticket_id.cmp(&b.ticket_id))
        });

        tracing::debug!(count = records.len(), "listed timers");
        Ok(records
            .into_iter()
            .map(|record| TimerSnapshot {
                elapsed_seconds: record.elapsed_seconds(now),
                record,
            })
            .collect())
    }
}
