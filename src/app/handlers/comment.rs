//! `comment › <KEY> › <text>`: compose a comment.

use crate::app::path::{path, NavigationContext};
use crate::app::registry::Flow;
use crate::app::workflow::Workflow;
use crate::app::Command;
use crate::domain::Result;
use crate::ui::ResultItem;
use futures_util::future::BoxFuture;

pub fn handle<'a>(workflow: &'a mut Workflow, query: &'a str) -> BoxFuture<'a, Result<Flow>> {
    Box::pin(async move { run(workflow, query) })
}

fn run(workflow: &mut Workflow, query: &str) -> Result<Flow> {
    let nav = NavigationContext::parse(query);
    let Some(key) = nav.context().filter(|key| !key.is_empty()) else {
        return Ok(Flow::Redirect {
            action: crate::app::router::MAIN_MENU,
            query: String::new(),
        });
    };
    let text = nav.filter();

    if text.is_empty() {
        workflow.feedback.set_default(
            ResultItem::drill(format!("Type your comment for {key}"), path(nav.location()))
                .with_icon("comment.png"),
        );
        return Ok(Flow::Done);
    }

    workflow.feedback.add_item(
        ResultItem::action(
            format!("Comment on {key}"),
            Command::Comment {
                key: key.to_string(),
                body: text.to_string(),
            }
            .to_string(),
        )
        .with_subtitle(text)
        .with_icon("comment.png"),
    );
    Ok(Flow::Done)
}

#[cfg(test)]
mod tests {
    use crate::app::Command;
    use crate::test_support::{configured, FakeTracker, Harness};

    #[tokio::test]
    async fn text_becomes_a_comment_command() {
        let harness = Harness::new(configured(), FakeTracker::default());

        let emission = harness.invoke("comment › PROJ-1 › ship it").await;

        let item = &emission.items[0];
        let command: Command = item.command.as_deref().unwrap().parse().unwrap();
        assert_eq!(
            command,
            Command::Comment {
                key: "PROJ-1".into(),
                body: "ship it".into()
            }
        );
        assert_eq!(harness.network_calls(), 0);
    }

    #[tokio::test]
    async fn empty_text_prompts() {
        let harness = Harness::new(configured(), FakeTracker::default());

        let emission = harness.invoke("comment › PROJ-1 › ").await;

        assert_eq!(emission.titles(), vec!["Type your comment for PROJ-1"]);
        assert!(emission.items.is_empty());
    }
}
