//! `assign › <KEY> › <filter>`: pick the user to assign a ticket to.
//!
//! Only reachable through the issue menu, which stores the ticket's current
//! assignee in the session under `<KEY>-assign`. Without that context the query
//! is handed to the main menu unchanged.

use crate::app::path::{path, NavigationContext};
use crate::app::registry::Flow;
use crate::app::router::MAIN_MENU;
use crate::app::workflow::Workflow;
use crate::app::Command;
use crate::domain::Result;
use crate::storage::{get_typed, AssignContext};
use crate::ui::ResultItem;
use futures_util::future::BoxFuture;
use regex::{Regex, RegexBuilder};
use tracing::Instrument;

pub fn handle<'a>(workflow: &'a mut Workflow, query: &'a str) -> BoxFuture<'a, Result<Flow>> {
    Box::pin(run(workflow, query).instrument(tracing::debug_span!("assign")))
}

/// Case-insensitive pattern for the filter; not a valid regex means a literal.
fn user_pattern(filter: &str) -> Result<Regex> {
    let build = |pattern: &str| RegexBuilder::new(pattern).case_insensitive(true).build();
    match build(filter) {
        Ok(pattern) => Ok(pattern),
        Err(_) => Ok(build(&regex::escape(filter))?),
    }
}

async fn run(workflow: &mut Workflow, query: &str) -> Result<Flow> {
    let nav = NavigationContext::parse(query);
    let filter = nav.filter();
    let key = nav.context().unwrap_or_default();

    let Some(context) =
        get_typed::<AssignContext>(workflow.session.as_ref(), &AssignContext::key_for(key))?
    else {
        tracing::debug!(key, "no assignment context, falling back to main menu");
        return Ok(Flow::Redirect {
            action: MAIN_MENU,
            query: query.to_string(),
        });
    };

    let here = path(nav.location());
    workflow.feedback.set_default(ResultItem::drill(
        format!("No user found matching: \"{filter}\""),
        here.clone(),
    ));

    let pattern = user_pattern(filter)?;
    let users = workflow.tracker.list_users().await?;
    let current = context.current_assignee.as_deref();

    let items: Vec<ResultItem> = users
        .into_iter()
        .filter(|user| Some(user.name.as_str()) != current)
        .filter(|user| pattern.is_match(user.name.trim()))
        .map(|user| {
            ResultItem::action(
                &user.name,
                Command::Assign {
                    key: key.to_string(),
                    username: user.username.clone(),
                }
                .to_string(),
            )
            .with_icon(user.icon())
            .with_continuation(format!("{here}{}", user.name))
        })
        .collect();

    tracing::debug!(key, matches = items.len(), "listing assignees");
    workflow.feedback.add_items(items);
    Ok(Flow::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::set_typed;
    use crate::test_support::{configured, user, FakeTracker, Harness};

    fn harness() -> Harness {
        let tracker = FakeTracker::default().with_users(vec![
            user("alice", "alice"),
            user("Alan", "alan"),
            user("bob", "bob"),
        ]);
        Harness::new(configured(), tracker)
    }

    fn store_context(harness: &Harness, key: &str, assignee: Option<&str>) {
        set_typed(
            harness.session.as_ref(),
            &AssignContext::key_for(key),
            &AssignContext {
                current_assignee: assignee.map(str::to_string),
            },
            None,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn lists_matching_users_except_current_assignee() {
        let harness = harness();
        store_context(&harness, "PROJ-1", Some("alice"));

        let emission = harness.invoke("assign › PROJ-1 › al").await;

        let default = emission.default.as_ref().unwrap();
        assert_eq!(default.title, "No user found matching: \"al\"");
        assert_eq!(default.continuation.as_deref(), Some("assign › PROJ-1 › "));

        assert_eq!(emission.items.len(), 1);
        let alan = &emission.items[0];
        assert_eq!(alan.title, "Alan");
        assert!(alan.selectable);
        assert_eq!(alan.command.as_deref(), Some("assign PROJ-1 alan"));
        assert_eq!(alan.continuation.as_deref(), Some("assign › PROJ-1 › Alan"));
        assert_eq!(alan.icon.as_deref(), Some("Alan.png"));
    }

    #[tokio::test]
    async fn missing_context_redirects_to_main_menu() {
        let harness = harness();

        let emission = harness.invoke("assign › PROJ-1 › al").await;

        // Main menu with filter "al" over empty bookmarks.
        assert_eq!(emission.titles(), vec!["Search Jira"]);
        assert!(harness.tracker.calls().iter().all(|c| c != "list_users"));
    }

    #[tokio::test]
    async fn invalid_regex_filter_matches_literally() {
        let tracker = FakeTracker::default()
            .with_users(vec![user("[qa] tester", "tester"), user("qa lead", "lead")]);
        let harness = Harness::new(configured(), tracker);
        store_context(&harness, "PROJ-1", None);

        let emission = harness.invoke("assign › PROJ-1 › [qa").await;

        let titles: Vec<_> = emission.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["[qa] tester"]);
    }
}
