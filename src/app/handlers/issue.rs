//! `issue › <KEY> › <filter>`: everything that can be done to one ticket.
//!
//! Drilling into a ticket from any list lands here. Besides offering the
//! per-ticket actions, this menu records the ticket's current assignee in the
//! session so the assign menu can leave them out.

use crate::app::handlers::matches_filter;
use crate::app::path::{path, NavigationContext};
use crate::app::registry::Flow;
use crate::app::workflow::Workflow;
use crate::app::Command;
use crate::domain::{JiraflowError, Result};
use crate::storage::{set_typed, AssignContext};
use crate::ui::{Modifier, ModifierVariant, ResultItem};
use futures_util::future::BoxFuture;
use tracing::Instrument;

pub fn handle<'a>(workflow: &'a mut Workflow, query: &'a str) -> BoxFuture<'a, Result<Flow>> {
    Box::pin(run(workflow, query).instrument(tracing::debug_span!("issue")))
}

async fn run(workflow: &mut Workflow, query: &str) -> Result<Flow> {
    let nav = NavigationContext::parse(query);
    let key = nav
        .context()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| JiraflowError::NotFound("no ticket selected".to_string()))?;

    let ticket = workflow
        .tracker
        .list_tickets(&format!("key = \"{key}\""))
        .await?
        .into_iter()
        .find(|ticket| ticket.key == key)
        .ok_or_else(|| JiraflowError::NotFound(key.to_string()))?;

    set_typed(
        workflow.session.as_ref(),
        &AssignContext::key_for(key),
        &AssignContext {
            current_assignee: ticket.assignee.clone(),
        },
        None,
    )?;

    let running = workflow.timers().info(key).is_ok();
    let progress = if running {
        ResultItem::drill("Work in progress…", path(&["in-progress", key]))
            .with_subtitle("Stop, log or discard the tracked time")
            .with_icon("stop.png")
    } else {
        ResultItem::action(
            "Start progress",
            Command::StartProgress(key.to_string()).to_string(),
        )
        .with_subtitle("Track time on this ticket")
        .with_icon("start.png")
    };

    let watch = if ticket.watching {
        ResultItem::action("Stop watching", Command::Unwatch(key.to_string()).to_string())
            .with_subtitle("Stop getting notifications for this ticket")
    } else {
        ResultItem::action("Watch", Command::Watch(key.to_string()).to_string())
            .with_subtitle("Get notified when this ticket changes")
    }
    .with_icon("watch.png");

    let assignee = ticket.assignee.as_deref().unwrap_or("Unassigned");
    let items = [
        ResultItem::action(
            format!("Open {key}"),
            Command::OpenIssue(key.to_string()).to_string(),
        )
        .with_subtitle(&ticket.summary)
        .with_icon(ticket.project_icon()),
        ResultItem::drill("Assign…", path(&["assign", key]))
            .with_subtitle(format!("Currently {assignee}"))
            .with_icon("assign.png"),
        ResultItem::drill("Comment…", path(&["comment", key])).with_icon("comment.png"),
        ResultItem::drill("Change status…", path(&["status", key]))
            .with_subtitle(format!("Currently {}", ticket.status))
            .with_icon("status.png")
            .with_modifier(
                Modifier::Alt,
                ModifierVariant::action(
                    "Open issue in browser",
                    Command::OpenIssue(key.to_string()).to_string(),
                ),
            ),
        watch,
        progress,
    ];

    let filter = nav.filter();
    workflow
        .feedback
        .add_items(items.into_iter().filter(|item| matches_filter(&item.title, filter)));
    Ok(Flow::Done)
}
