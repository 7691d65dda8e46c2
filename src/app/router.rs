//! Query classification and dispatch.
//!
//! Rules are `(pattern, action)` pairs tested against the raw query in the
//! order they were added; the first match wins and no match means
//! `mainMenu`. The order is observable behavior: a query that merely contains
//! `status` somewhere routes to the status menu unless an earlier rule caught
//! it first, so more specific patterns must be added before general ones.

use crate::app::handlers;
use crate::app::registry::{Flow, Handler, Registry};
use crate::app::workflow::Workflow;
use crate::domain::{JiraflowError, Result};
use regex::Regex;

/// Action run when no rule matches.
pub const MAIN_MENU: &str = "mainMenu";

/// Redirect chains longer than this are treated as a loop.
const MAX_REDIRECTS: usize = 4;

/// Classifies queries and runs the matching handler.
#[derive(Debug, Default)]
pub struct Router {
    registry: Registry,
    rules: Vec<(Regex, String)>,
}

impl Router {
    /// An empty router with no handlers and no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The workflow's full action table.
    ///
    /// # Errors
    ///
    /// Returns [`JiraflowError::InvalidPattern`] if a rule fails to compile.
    pub fn standard() -> Result<Self> {
        let mut router = Self::new();

        router.register(MAIN_MENU, handlers::main_menu::handle);
        router.register("issue", handlers::issue::handle);
        router.register("tickets", handlers::tickets::handle);
        router.register("search", handlers::search::handle);
        router.register("settings", handlers::settings::handle);
        router.register("create", handlers::create::handle);
        router.register("assign", handlers::assign::handle);
        router.register("comment", handlers::comment::handle);
        router.register("status", handlers::status::handle);
        router.register("in-progress", handlers::progress::handle);

        router.add_rule(r"^issue ›", "issue")?;
        router.add_rule("tickets", "tickets")?;
        router.add_rule(r"bookmark-\d+", "tickets")?;
        router.add_rule("search", "search")?;
        router.add_rule("settings", "settings")?;
        router.add_rule("create", "create")?;
        router.add_rule("assign", "assign")?;
        router.add_rule("comment", "comment")?;
        router.add_rule("status", "status")?;
        router.add_rule("in-progress", "in-progress")?;

        Ok(router)
    }

    /// Registers a handler, returning the one it replaced.
    pub fn register(&mut self, name: &str, handler: Handler) -> Option<Handler> {
        self.registry.register(name, handler)
    }

    /// Appends a classification rule after every existing one.
    ///
    /// # Errors
    ///
    /// Returns [`JiraflowError::InvalidPattern`] if `pattern` is not a valid
    /// regular expression.
    pub fn add_rule(&mut self, pattern: &str, action: &str) -> Result<()> {
        self.rules.push((Regex::new(pattern)?, action.to_string()));
        Ok(())
    }

    /// The action the first matching rule names, or `mainMenu`.
    #[must_use]
    pub fn classify(&self, raw: &str) -> &str {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.is_match(raw))
            .map_or(MAIN_MENU, |(_, action)| action.as_str())
    }

    /// Runs the handler registered under `name`.
    ///
    /// # Panics
    ///
    /// Panics if no handler is registered under `name`; every name a rule or
    /// redirect can produce is registered at startup.
    ///
    /// # Errors
    ///
    /// Returns whatever the handler returns.
    pub async fn handle(&self, name: &str, workflow: &mut Workflow, raw: &str) -> Result<Flow> {
        let Some(handler) = self.registry.get(name) else {
            panic!("no handler registered for action {name:?}");
        };
        handler(workflow, raw).await
    }

    /// Classifies `raw` and runs handlers until one finishes without a
    /// redirect.
    ///
    /// # Panics
    ///
    /// Panics if handlers keep redirecting to each other for more than
    /// `MAX_REDIRECTS` hops; a redirect must always reach a handler that
    /// finishes.
    ///
    /// # Errors
    ///
    /// Returns the first handler error.
    pub async fn dispatch(&self, workflow: &mut Workflow, raw: &str) -> Result<()> {
        let mut action = self.classify(raw).to_string();
        let mut query = raw.to_string();

        for _ in 0..=MAX_REDIRECTS {
            tracing::debug!(action = %action, query = %query, "dispatching");
            match self.handle(&action, workflow, &query).await? {
                Flow::Done => return Ok(()),
                Flow::Redirect {
                    action: next,
                    query: next_query,
                } => {
                    tracing::debug!(from = %action, to = next, "redirect");
                    action = next.to_string();
                    query = next_query;
                }
            }
        }

        panic!("handlers for {raw:?} redirected more than {MAX_REDIRECTS} times");
    }

    /// Entry point for one script-filter invocation.
    ///
    /// Any handler error becomes a single error entry with the error's hint,
    /// then the feedback is emitted (a no-op if the handler already did).
    /// Rejected credentials also clear the saved token, so the next main menu
    /// offers Login instead of failing again.
    ///
    /// # Errors
    ///
    /// Returns an error only if the result document cannot be written.
    pub async fn run(&self, workflow: &mut Workflow, raw: &str) -> Result<()> {
        if let Err(e) = self.dispatch(workflow, raw).await {
            if matches!(e, JiraflowError::Unauthorized(_)) {
                if let Err(save) = workflow.forget_credentials() {
                    tracing::warn!(error = %save, "could not clear rejected token");
                }
            }
            workflow.feedback.report_error(&e, e.hint())?;
        }
        workflow.feedback.emit()
    }
}
