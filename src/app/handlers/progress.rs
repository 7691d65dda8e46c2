//! `in-progress › <KEY> › <filter>`: act on a running work timer.

use crate::app::handlers::matches_filter;
use crate::app::path::NavigationContext;
use crate::app::registry::Flow;
use crate::app::workflow::Workflow;
use crate::app::Command;
use crate::domain::{format_elapsed, JiraflowError, Result};
use crate::ui::ResultItem;
use futures_util::future::BoxFuture;

pub fn handle<'a>(workflow: &'a mut Workflow, query: &'a str) -> BoxFuture<'a, Result<Flow>> {
    Box::pin(async move { run(workflow, query) })
}

fn run(workflow: &mut Workflow, query: &str) -> Result<Flow> {
    let _span = tracing::debug_span!("in_progress").entered();

    let nav = NavigationContext::parse(query);
    let key = nav
        .context()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| JiraflowError::NotFound("no ticket in progress".to_string()))?;

    let info = workflow.timers().info(key)?;
    let elapsed = format_elapsed(info.elapsed_seconds);
    let state = if info.record.is_running() {
        "running"
    } else {
        "stopped, not yet logged"
    };

    let items = [
        ResultItem::action(
            format!("Stop and log {elapsed}"),
            Command::StopProgress(key.to_string()).to_string(),
        )
        .with_subtitle(format!("{key} · {state}"))
        .with_icon("stop.png"),
        ResultItem::action(
            "Stop without logging",
            Command::ClearProgress(key.to_string()).to_string(),
        )
        .with_subtitle(format!("Discard {elapsed} tracked on {key}"))
        .with_icon("clear.png"),
        ResultItem::action(
            format!("Open {key} in browser"),
            Command::OpenIssue(key.to_string()).to_string(),
        )
        .with_icon("browser.png"),
    ];

    let filter = nav.filter();
    workflow
        .feedback
        .add_items(items.into_iter().filter(|item| matches_filter(&item.title, filter)));
    Ok(Flow::Done)
}

#[cfg(test)]
mod tests {
    use crate::domain::JiraflowError;
    use crate::test_support::{configured, FakeTracker, Harness};

    #[tokio::test]
    async fn offers_stop_clear_and_open() {
        let harness = Harness::new(configured(), FakeTracker::default());
        harness.workflow().timers().start("PROJ-1").unwrap();
        harness.clock.advance(3900);

        let emission = harness.invoke("in-progress › PROJ-1 › ").await;

        assert_eq!(
            emission.titles(),
            vec!["Stop and log 1h 5m", "Stop without logging", "Open PROJ-1 in browser"]
        );
        assert_eq!(
            emission.items[0].command.as_deref(),
            Some("stopProgress PROJ-1")
        );
    }

    #[tokio::test]
    async fn missing_timer_is_not_found() {
        let harness = Harness::new(configured(), FakeTracker::default());

        let emission = harness.invoke("in-progress › PROJ-2 › ").await;

        assert_eq!(emission.entries().len(), 1);
        assert!(emission.items[0]
            .title
            .starts_with(&JiraflowError::NotFound(String::new()).to_string()));
    }
}
