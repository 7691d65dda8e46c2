//! `status › <KEY> › <filter>`: move a ticket through a workflow transition.

use crate::app::handlers::matches_filter;
use crate::app::path::{path, NavigationContext};
use crate::app::registry::Flow;
use crate::app::workflow::Workflow;
use crate::app::Command;
use crate::domain::{JiraflowError, Result};
use crate::ui::ResultItem;
use futures_util::future::BoxFuture;
use tracing::Instrument;

pub fn handle<'a>(workflow: &'a mut Workflow, query: &'a str) -> BoxFuture<'a, Result<Flow>> {
    Box::pin(run(workflow, query).instrument(tracing::debug_span!("status")))
}

async fn run(workflow: &mut Workflow, query: &str) -> Result<Flow> {
    let nav = NavigationContext::parse(query);
    let key = nav
        .context()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| JiraflowError::NotFound("no ticket to change status of".to_string()))?;
    let filter = nav.filter();

    workflow.feedback.set_default(ResultItem::drill(
        format!("No transition matching \"{filter}\""),
        path(nav.location()),
    ));

    let transitions = workflow.tracker.transitions(key).await?;
    let items: Vec<ResultItem> = transitions
        .into_iter()
        .filter(|transition| matches_filter(&transition.name, filter))
        .map(|transition| {
            ResultItem::action(
                &transition.name,
                Command::Transition {
                    key: key.to_string(),
                    transition_id: transition.id.clone(),
                }
                .to_string(),
            )
            .with_subtitle(format!("Move {key} to {}", transition.name))
            .with_icon("status.png")
        })
        .collect();

    workflow.feedback.add_items(items);
    Ok(Flow::Done)
}
