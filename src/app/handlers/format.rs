//! Ticket list formatting shared by the bookmark, search and main menus.

use crate::app::path::path;
use crate::app::Command;
use crate::domain::Ticket;
use crate::ui::{Modifier, ModifierVariant, ResultItem};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Keeps the tickets matching `filter` and turns them into entries.
///
/// Every whitespace-separated token of the filter must fuzzy-match
/// `"<KEY> <summary>"`; order is preserved. Each entry opens the ticket,
/// drills into its action menu, and starts progress with `cmd`.
#[must_use]
pub fn format_tickets(tickets: &[Ticket], filter: &str) -> Vec<ResultItem> {
    let tokens: Vec<String> = filter.split_whitespace().map(str::to_lowercase).collect();
    let matcher = SkimMatcherV2::default();

    tickets
        .iter()
        .filter(|ticket| {
            if tokens.is_empty() {
                return true;
            }
            let haystack = format!("{} {}", ticket.key, ticket.summary).to_lowercase();
            tokens
                .iter()
                .all(|token| matcher.fuzzy_match(&haystack, token).is_some())
        })
        .map(ticket_item)
        .collect()
}

fn ticket_item(ticket: &Ticket) -> ResultItem {
    let assignee = ticket.assignee.as_deref().unwrap_or("Unassigned");
    ResultItem::action(
        format!("{}: {}", ticket.key, ticket.summary),
        Command::OpenIssue(ticket.key.clone()).to_string(),
    )
    .with_subtitle(format!("{} · {} · {assignee}", ticket.key, ticket.status))
    .with_icon(ticket.project_icon())
    .with_continuation(path(&["issue", ticket.key.as_str()]))
    .with_modifier(
        Modifier::Cmd,
        ModifierVariant::action(
            "Start progress",
            Command::StartProgress(ticket.key.clone()).to_string(),
        ),
    )
}
