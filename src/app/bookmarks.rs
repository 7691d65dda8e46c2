//! Bookmark ticket lists with a TTL cache in the data store.
//!
//! Listing a bookmark serves the cached list under `cache:bookmark-<N>` while
//! it is live and falls back to the tracker otherwise. The `--refresh` run
//! re-fetches every bookmark in the background so the next keystroke hits the
//! cache.

use crate::app::workflow::Workflow;
use crate::domain::{JiraflowError, Result, Ticket};
use crate::storage::models::BOOKMARK_CACHE_PREFIX;
use crate::storage::{get_typed, set_typed, KeyValueStore};
use futures_util::future::try_join_all;
use std::collections::HashMap;

/// Prefix shared by every disposable cache entry.
const CACHE_PREFIX: &str = "cache:";

fn cache_key(index: usize) -> String {
    format!("{BOOKMARK_CACHE_PREFIX}{index}")
}

/// Parses a `bookmark-N` segment into its index.
#[must_use]
pub fn parse_segment(segment: &str) -> Option<usize> {
    segment.strip_prefix("bookmark-")?.trim().parse().ok()
}

async fn fetch(workflow: &Workflow, index: usize) -> Result<Vec<Ticket>> {
    let bookmark = workflow
        .config
        .bookmarks
        .get(index)
        .ok_or_else(|| JiraflowError::NotFound(format!("bookmark-{index}")))?;

    let tickets = workflow.tracker.list_tickets(&bookmark.jql).await?;
    set_typed(
        workflow.data.as_ref(),
        &cache_key(index),
        &tickets,
        Some(workflow.config.cache_ttl()),
    )?;
    Ok(tickets)
}

/// Lists bookmark `index`, from the cache when it is still live.
///
/// # Errors
///
/// - [`JiraflowError::NotFound`] if no bookmark has that index
/// - the tracker's error if the list had to be fetched and the fetch failed
pub async fn list(workflow: &Workflow, index: usize) -> Result<Vec<Ticket>> {
    if let Some(cached) = get_typed::<Vec<Ticket>>(workflow.data.as_ref(), &cache_key(index))? {
        tracing::debug!(index, count = cached.len(), "bookmark cache hit");
        return Ok(cached);
    }
    fetch(workflow, index).await
}

/// Lists every bookmark concurrently and merges the results.
///
/// A single failed list fails the whole call.
///
/// # Errors
///
/// Returns the first error any bookmark list produced.
pub async fn list_all(workflow: &Workflow) -> Result<Vec<Ticket>> {
    let lists = try_join_all((0..workflow.config.bookmarks.len()).map(|i| list(workflow, i))).await?;
    Ok(merge_by_key(lists))
}

/// Re-fetches every bookmark from the tracker, replacing the cache.
///
/// Returns the number of tickets fetched.
///
/// # Errors
///
/// Returns the first fetch error; lists fetched before it stay cached.
pub async fn refresh_all(workflow: &Workflow) -> Result<usize> {
    let lists = try_join_all((0..workflow.config.bookmarks.len()).map(|i| fetch(workflow, i))).await?;
    Ok(lists.iter().map(Vec::len).sum())
}

/// Removes every cache entry from the data store, leaving timers alone.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub fn clear_cache(store: &dyn KeyValueStore) -> Result<usize> {
    let keys: Vec<String> = store
        .keys()?
        .into_iter()
        .filter(|key| key.starts_with(CACHE_PREFIX))
        .collect();
    for key in &keys {
        store.delete(key)?;
    }
    tracing::debug!(removed = keys.len(), "cache cleared");
    Ok(keys.len())
}

/// Flattens ticket lists, de-duplicating by key.
///
/// A later occurrence replaces the earlier ticket's data but the ticket keeps
/// the position where its key was first seen.
#[must_use]
pub fn merge_by_key(lists: Vec<Vec<Ticket>>) -> Vec<Ticket> {
    let mut merged: Vec<Ticket> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for ticket in lists.into_iter().flatten() {
        if let Some(&position) = positions.get(&ticket.key) {
            merged[position] = ticket;
        } else {
            positions.insert(ticket.key.clone(), merged.len());
            merged.push(ticket);
        }
    }
    merged
}
