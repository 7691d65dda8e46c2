//! `search › <text>`: free-text search across the tracker.

use crate::app::handlers::format::format_tickets;
use crate::app::path::{path, NavigationContext};
use crate::app::registry::Flow;
use crate::app::workflow::Workflow;
use crate::domain::Result;
use crate::ui::ResultItem;
use futures_util::future::BoxFuture;
use tracing::Instrument;

pub fn handle<'a>(workflow: &'a mut Workflow, query: &'a str) -> BoxFuture<'a, Result<Flow>> {
    Box::pin(run(workflow, query).instrument(tracing::debug_span!("search")))
}

async fn run(workflow: &mut Workflow, query: &str) -> Result<Flow> {
    let nav = NavigationContext::parse(query);
    // "search › foo › " and "search › foo" both search for "foo".
    let text = nav
        .segments()
        .iter()
        .skip(1)
        .rev()
        .find(|segment| !segment.is_empty())
        .map_or("", String::as_str);

    if text.is_empty() {
        workflow
            .feedback
            .set_default(ResultItem::drill("Search Jira for…", path(&["search"])).with_icon("search.png"));
        return Ok(Flow::Done);
    }

    let tickets = workflow.tracker.search(text).await?;
    tracing::debug!(text, count = tickets.len(), "search results");

    if tickets.is_empty() {
        workflow.feedback.set_default(
            ResultItem::drill(format!("No tickets found for \"{text}\""), path(&["search"]))
                .with_icon("search.png"),
        );
        return Ok(Flow::Done);
    }

    workflow.feedback.add_items(format_tickets(&tickets, ""));
    Ok(Flow::Done)
}
