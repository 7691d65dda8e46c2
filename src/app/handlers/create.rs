//! `create › <filter>`: pick the issue type of a new ticket.

use crate::app::handlers::matches_filter;
use crate::app::path::NavigationContext;
use crate::app::registry::Flow;
use crate::app::workflow::Workflow;
use crate::app::Command;
use crate::domain::Result;
use crate::ui::ResultItem;
use futures_util::future::BoxFuture;
use tracing::Instrument;

pub fn handle<'a>(workflow: &'a mut Workflow, query: &'a str) -> BoxFuture<'a, Result<Flow>> {
    Box::pin(run(workflow, query).instrument(tracing::debug_span!("create")))
}

async fn run(workflow: &mut Workflow, query: &str) -> Result<Flow> {
    let nav = NavigationContext::parse(query);
    let filter = nav.filter();

    // Sub-tasks need a parent ticket and cannot be created from here.
    let kinds = workflow.tracker.issue_types().await?;
    let items: Vec<ResultItem> = kinds
        .into_iter()
        .filter(|kind| !kind.subtask && matches_filter(&kind.name, filter))
        .map(|kind| {
            ResultItem::action(
                format!("New {}", kind.name),
                Command::CreateIssue(kind.id.clone()).to_string(),
            )
            .with_icon("edit.png")
        })
        .collect();

    workflow.feedback.add_items(items);
    Ok(Flow::Done)
}
