//! The root menu, shown for any query no rule claims.

use crate::app::bookmarks;
use crate::app::handlers::format::format_tickets;
use crate::app::path::{path, NavigationContext};
use crate::app::registry::Flow;
use crate::app::workflow::Workflow;
use crate::app::Command;
use crate::domain::{format_elapsed, project_icon, JiraflowError, Result};
use crate::ui::{Modifier, ModifierVariant, ResultItem};
use futures_util::future::BoxFuture;
use tracing::Instrument;

const BOOKMARK_ERROR_HINT: &str = "Check the syntax of your bookmarks.";

pub fn handle<'a>(workflow: &'a mut Workflow, query: &'a str) -> BoxFuture<'a, Result<Flow>> {
    Box::pin(run(workflow, query).instrument(tracing::debug_span!("main_menu")))
}

async fn run(workflow: &mut Workflow, query: &str) -> Result<Flow> {
    let nav = NavigationContext::parse(query);
    let term = nav.filter();

    if !workflow.config.is_configured() {
        tracing::debug!("not configured, offering login");
        workflow.feedback.add_item(
            ResultItem::action("Login", Command::Login.to_string()).with_icon("login.png"),
        );
        workflow.feedback.emit()?;
        return Ok(Flow::Done);
    }

    if let Err(e) = workflow.launcher.spawn_refresh() {
        tracing::warn!(error = %e, "background refresh not started");
    }

    let search = if term.is_empty() {
        path(&["search"])
    } else {
        path(&["search", term])
    };
    workflow
        .feedback
        .set_default(ResultItem::drill("Search Jira", search).with_icon("search.png"));

    if term.is_empty() {
        static_menu(workflow)?;
        workflow.feedback.emit()?;
        workflow.session.clear()?;
        return Ok(Flow::Done);
    }

    match bookmarks::list_all(workflow).await {
        Ok(tickets) => {
            tracing::debug!(count = tickets.len(), term, "filtering bookmarked tickets");
            let items = format_tickets(&tickets, term);
            workflow.feedback.add_items(items);
        }
        // Not a bookmark problem; the router clears the token.
        Err(e @ JiraflowError::Unauthorized(_)) => return Err(e),
        Err(e) => workflow.feedback.report_error(&e, Some(BOOKMARK_ERROR_HINT))?,
    }
    Ok(Flow::Done)
}

/// Timers, bookmark shortcuts, create and settings, in that order.
fn static_menu(workflow: &mut Workflow) -> Result<()> {
    let timers = workflow.timers().list_all()?;
    workflow.feedback.add_items(timers.into_iter().map(|timer| {
        let key = timer.record.ticket_id;
        ResultItem::drill(format!("{key} (In Progress)"), path(&["in-progress", key.as_str()]))
            .with_subtitle(format_elapsed(timer.elapsed_seconds))
            .with_icon(project_icon(&key))
            .with_modifier(
                Modifier::Cmd,
                ModifierVariant::action(
                    "Stop progress without logging time",
                    Command::ClearProgress(key.clone()).to_string(),
                ),
            )
            .with_modifier(
                Modifier::Alt,
                ModifierVariant::action(
                    "Open issue in browser",
                    Command::OpenIssue(key.clone()).to_string(),
                ),
            )
    }));

    let shortcuts: Vec<ResultItem> = workflow
        .config
        .bookmarks
        .iter()
        .enumerate()
        .map(|(i, bookmark)| {
            ResultItem::drill(&bookmark.name, path(&[format!("bookmark-{i}")]))
                .with_icon(bookmark.icon.as_deref().unwrap_or("bookmark.png"))
        })
        .collect();
    workflow.feedback.add_items(shortcuts);
    workflow.feedback.add_item(
        ResultItem::drill("Create a New Issue", path(&["create"])).with_icon("edit.png"),
    );
    workflow
        .feedback
        .add_item(ResultItem::drill("Settings", path(&["settings"])).with_icon("config.png"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::KeyValueStore;
    use crate::test_support::{configured, ticket, FakeTracker, Harness};
    use serde_json::json;

    #[tokio::test]
    async fn unconfigured_offers_only_login() {
        let harness = Harness::new(crate::Config::default(), FakeTracker::default());
        let emission = harness.invoke("anything").await;

        assert_eq!(emission.titles(), vec!["Login"]);
        let login = &emission.items[0];
        assert!(login.selectable);
        assert_eq!(login.command.as_deref(), Some("login"));
        assert_eq!(harness.network_calls(), 0);
        assert_eq!(harness.launcher.refreshes(), 0);
    }

    #[tokio::test]
    async fn empty_filter_lists_static_menu_in_order() {
        let harness = Harness::new(configured(), FakeTracker::default());
        harness.session.set("A-1-assign", json!({}), None).unwrap();
        {
            let workflow = harness.workflow();
            workflow.timers().start("A-1").unwrap();
        }
        harness.clock.advance(300);

        let emission = harness.invoke("").await;

        assert_eq!(
            emission.titles(),
            vec![
                "Search Jira",
                "A-1 (In Progress)",
                "Mine",
                "Team",
                "Create a New Issue",
                "Settings"
            ]
        );
        let timer = &emission.items[0];
        assert!(!timer.selectable);
        assert_eq!(timer.subtitle.as_deref(), Some("5m"));
        assert_eq!(timer.continuation.as_deref(), Some("in-progress › A-1 › "));
        assert_eq!(
            timer.modifiers[&Modifier::Cmd].command.as_deref(),
            Some("clearProgress A-1")
        );
        assert_eq!(
            timer.modifiers[&Modifier::Alt].command.as_deref(),
            Some("openIssue A-1")
        );
        assert_eq!(emission.items[1].icon.as_deref(), Some("mine.png"));
        assert_eq!(emission.items[2].icon.as_deref(), Some("bookmark.png"));
        assert_eq!(
            emission.items[1].continuation.as_deref(),
            Some("bookmark-0 › ")
        );

        assert_eq!(harness.network_calls(), 0);
        assert_eq!(harness.launcher.refreshes(), 1);
        assert!(harness.session_keys().is_empty());
    }

    #[tokio::test]
    async fn filter_merges_bookmarks_without_static_block() {
        let mut updated = ticket("A-1", "Fix login flow");
        updated.status = "In Review".to_string();
        let tracker = FakeTracker::default()
            .with_tickets(
                "mine",
                vec![ticket("A-1", "Fix login"), ticket("B-2", "Login docs")],
            )
            .with_tickets("team", vec![updated, ticket("C-3", "Unrelated")]);
        let harness = Harness::new(configured(), tracker);

        let emission = harness.invoke("login").await;

        assert_eq!(
            emission.default.as_ref().map(|d| d.title.as_str()),
            Some("Search Jira")
        );
        assert_eq!(
            emission.default.as_ref().unwrap().continuation.as_deref(),
            Some("search › login › ")
        );
        let titles: Vec<_> = emission.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A-1: Fix login flow", "B-2: Login docs"]);
        assert_eq!(
            emission.items[0].subtitle.as_deref(),
            Some("A-1 · In Review · Unassigned")
        );
        assert!(!titles.contains(&"Settings"));
    }

    #[tokio::test]
    async fn failing_bookmark_reports_one_error() {
        let tracker = FakeTracker::default()
            .with_tickets("mine", vec![ticket("A-1", "x")])
            .failing_jql("team");
        let harness = Harness::new(configured(), tracker);

        let emission = harness.invoke("x").await;

        assert_eq!(emission.entries().len(), 1);
        assert_eq!(
            emission.items[0].subtitle.as_deref(),
            Some(BOOKMARK_ERROR_HINT)
        );
    }

    #[tokio::test]
    async fn filter_skips_timers_entirely() {
        let tracker = FakeTracker::default().with_tickets("mine", vec![ticket("A-1", "Fix login")]);
        let harness = Harness::new(configured(), tracker);
        // Unreadable as a timer; only the empty-filter menu would notice.
        harness
            .data
            .set("in-progress:A-1", json!("garbled"), None)
            .unwrap();

        let emission = harness.invoke("login").await;

        assert_eq!(emission.titles(), vec!["Search Jira", "A-1: Fix login"]);
    }

    #[tokio::test]
    async fn rejected_credentials_skip_the_bookmark_hint() {
        let harness = Harness::new(
            configured(),
            FakeTracker::default().rejecting_credentials(),
        );

        let emission = harness.invoke("x").await;

        assert_eq!(emission.entries().len(), 1);
        assert!(emission.items[0].title.starts_with("Credentials rejected"));
        assert_ne!(
            emission.items[0].subtitle.as_deref(),
            Some(BOOKMARK_ERROR_HINT)
        );
    }

    #[tokio::test]
    async fn filter_leaves_session_intact() {
        let harness = Harness::new(configured(), FakeTracker::default());
        harness.session.set("A-1-assign", json!({}), None).unwrap();

        harness.invoke("anything").await;

        assert_eq!(harness.session_keys(), vec!["A-1-assign".to_string()]);
    }
}
