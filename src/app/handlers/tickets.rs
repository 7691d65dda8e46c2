//! `bookmark-<N> › <filter>`: the tickets of one bookmark.
//!
//! A query naming `tickets` without a bookmark index lists every bookmark
//! merged, like the filtered main menu.

use crate::app::bookmarks;
use crate::app::handlers::format::format_tickets;
use crate::app::path::NavigationContext;
use crate::app::registry::Flow;
use crate::app::workflow::Workflow;
use crate::domain::Result;
use futures_util::future::BoxFuture;
use tracing::Instrument;

pub fn handle<'a>(workflow: &'a mut Workflow, query: &'a str) -> BoxFuture<'a, Result<Flow>> {
    Box::pin(run(workflow, query).instrument(tracing::debug_span!("tickets")))
}

async fn run(workflow: &mut Workflow, query: &str) -> Result<Flow> {
    let nav = NavigationContext::parse(query);
    let bookmark = nav
        .location()
        .iter()
        .find_map(|segment| bookmarks::parse_segment(segment));

    let tickets = match bookmark {
        Some(index) => bookmarks::list(workflow, index).await?,
        None => bookmarks::list_all(workflow).await?,
    };

    tracing::debug!(?bookmark, count = tickets.len(), "listing tickets");
    let items = format_tickets(&tickets, nav.filter());
    workflow.feedback.add_items(items);
    Ok(Flow::Done)
}

#[cfg(test)]
mod tests {
    use crate::domain::JiraflowError;
    use crate::test_support::{configured, ticket, FakeTracker, Harness};

    #[tokio::test]
    async fn lists_one_bookmark_filtered() {
        let tracker = FakeTracker::default()
            .with_tickets("mine", vec![ticket("A-1", "Fix login"), ticket("A-2", "Docs")])
            .with_tickets("team", vec![ticket("B-1", "Login too")]);
        let harness = Harness::new(configured(), tracker);

        let emission = harness.invoke("bookmark-0 › login").await;

        assert_eq!(emission.titles(), vec!["A-1: Fix login"]);
        assert_eq!(harness.tracker.calls(), vec!["list_tickets mine".to_string()]);
    }

    #[tokio::test]
    async fn unknown_bookmark_renders_not_found() {
        let harness = Harness::new(configured(), FakeTracker::default());

        let emission = harness.invoke("bookmark-9 › ").await;

        assert_eq!(emission.entries().len(), 1);
        assert_eq!(
            emission.items[0].title,
            JiraflowError::NotFound("bookmark-9".to_string()).to_string()
        );
    }
}
