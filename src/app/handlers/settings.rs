//! `settings › <filter>`: static maintenance actions.

use crate::app::handlers::matches_filter;
use crate::app::path::NavigationContext;
use crate::app::registry::Flow;
use crate::app::workflow::Workflow;
use crate::app::Command;
use crate::domain::Result;
use crate::ui::ResultItem;
use futures_util::future::BoxFuture;

pub fn handle<'a>(workflow: &'a mut Workflow, query: &'a str) -> BoxFuture<'a, Result<Flow>> {
    Box::pin(async move { run(workflow, query) })
}

fn entries() -> [(&'static str, &'static str, Command); 4] {
    [
        (
            "Edit Settings",
            "Open config.toml",
            Command::EditSettings,
        ),
        (
            "Refresh Cache",
            "Fetch every bookmark again in the background",
            Command::RefreshCache,
        ),
        (
            "Clear Cache",
            "Forget cached ticket lists",
            Command::ClearCache,
        ),
        ("Logout", "Forget the stored API token", Command::Logout),
    ]
}

fn run(workflow: &mut Workflow, query: &str) -> Result<Flow> {
    let nav = NavigationContext::parse(query);
    let filter = nav.filter();

    workflow.feedback.add_items(
        entries()
            .into_iter()
            .filter(|(title, _, _)| matches_filter(title, filter))
            .map(|(title, subtitle, command)| {
                ResultItem::action(title, command.to_string())
                    .with_subtitle(subtitle)
                    .with_icon("config.png")
            }),
    );
    Ok(Flow::Done)
}

#[cfg(test)]
mod tests {
    use crate::test_support::{configured, FakeTracker, Harness};

    #[tokio::test]
    async fn filters_static_entries() {
        let harness = Harness::new(configured(), FakeTracker::default());

        let all = harness.invoke("settings › ").await;
        assert_eq!(all.items.len(), 4);

        let cache = harness.invoke("settings › cache").await;
        assert_eq!(cache.titles(), vec!["Refresh Cache", "Clear Cache"]);
        assert_eq!(cache.items[1].command.as_deref(), Some("clearCache"));
    }
}
