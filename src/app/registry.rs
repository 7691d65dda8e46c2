//! Action registry: handler lookup by name.

use crate::app::workflow::Workflow;
use crate::domain::Result;
use futures_util::future::BoxFuture;
use std::collections::HashMap;

/// What the router does after a handler returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// The handler filled the feedback; emit it.
    Done,

    /// Run another action on `query` instead. Used when a handler finds its
    /// context missing and falls back to a different menu.
    Redirect { action: &'static str, query: String },
}

/// A menu handler.
///
/// Handlers push entries into `workflow.feedback` and return. A handler that
/// emits itself (to report an error with its own hint, or to do work after
/// the document is out) leaves the router's final emit a no-op.
pub type Handler = for<'a> fn(&'a mut Workflow, &'a str) -> BoxFuture<'a, Result<Flow>>;

/// Name → handler map, filled once at startup.
#[derive(Default)]
pub struct Registry {
    handlers: HashMap<String, Handler>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, returning the handler it replaced.
    pub fn register(&mut self, name: impl Into<String>, handler: Handler) -> Option<Handler> {
        let name = name.into();
        let previous = self.handlers.insert(name.clone(), handler);
        if previous.is_some() {
            tracing::debug!(action = %name, "handler replaced");
        }
        previous
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Handler> {
        self.handlers.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("Registry").field("actions", &names).finish()
    }
}
