//! Result accumulator.
//!
//! Handlers push entries into [`Feedback`] while they work; the router emits it
//! once at the end of the invocation. Emitting twice is a programming slip, not
//! a failure: the second call is logged and ignored so no code path can write
//! two documents to stdout.

use crate::domain::error::Result;
use crate::ui::item::ResultItem;
use crate::ui::renderer;
use std::fmt;
use std::io::Write;

/// Icon shown on error entries.
pub const ERROR_ICON: &str = "error.png";

/// What was (or would be) written: the default entry and the list after it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Emission {
    pub default: Option<ResultItem>,
    pub items: Vec<ResultItem>,
}

impl Emission {
    /// All entries in render order, default first.
    #[must_use]
    pub fn entries(&self) -> Vec<&ResultItem> {
        self.default.iter().chain(self.items.iter()).collect()
    }

    /// Titles in render order.
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        self.entries()
            .into_iter()
            .map(|item| item.title.as_str())
            .collect()
    }
}

/// Collects result entries and writes them exactly once.
pub struct Feedback {
    default: Option<ResultItem>,
    items: Vec<ResultItem>,
    emitted: Option<Emission>,
    sink: Box<dyn Write + Send + Sync>,
}

impl Feedback {
    /// Creates an accumulator writing to `sink` (stdout in production).
    #[must_use]
    pub fn new(sink: Box<dyn Write + Send + Sync>) -> Self {
        Self {
            default: None,
            items: Vec::new(),
            emitted: None,
            sink,
        }
    }

    /// Sets the entry rendered first. The last call wins.
    pub fn set_default(&mut self, item: ResultItem) {
        debug_assert!(item.is_consistent(), "inconsistent default: {item:?}");
        self.default = Some(item);
    }

    pub fn add_item(&mut self, item: ResultItem) {
        debug_assert!(item.is_consistent(), "inconsistent item: {item:?}");
        self.items.push(item);
    }

    pub fn add_items(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        for item in items {
            self.add_item(item);
        }
    }

    /// Drops every listed entry; the default is kept.
    pub fn clear_items(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    #[must_use]
    pub fn default_item(&self) -> Option<&ResultItem> {
        self.default.as_ref()
    }

    #[must_use]
    pub const fn is_emitted(&self) -> bool {
        self.emitted.is_some()
    }

    /// The document written by [`emit`](Self::emit), if it ran.
    #[must_use]
    pub const fn emission(&self) -> Option<&Emission> {
        self.emitted.as_ref()
    }

    /// Writes the default and the items to the sink.
    ///
    /// When items accompany a default that drills down, the default is rendered
    /// non-selectable so activating it cannot shadow the list. Only the first
    /// call writes; later calls are no-ops.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written to the sink.
    pub fn emit(&mut self) -> Result<()> {
        if self.emitted.is_some() {
            tracing::warn!("feedback already emitted, ignoring");
            return Ok(());
        }

        let mut default = self.default.take();
        if !self.items.is_empty() {
            if let Some(item) = default.as_mut().filter(|item| item.continuation.is_some()) {
                item.selectable = false;
            }
        }

        let emission = Emission {
            default,
            items: std::mem::take(&mut self.items),
        };
        tracing::debug!(items = emission.items.len(), "emitting feedback");

        let result = renderer::render(&emission, self.sink.as_mut());
        self.emitted = Some(emission);
        result
    }

    /// Replaces everything collected so far with one error entry and emits it.
    ///
    /// The entry is not selectable; activating it returns to the main menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written to the sink.
    pub fn report_error(&mut self, err: &dyn fmt::Display, hint: Option<&str>) -> Result<()> {
        if self.emitted.is_some() {
            tracing::warn!(error = %err, "error after emit, not shown");
            return Ok(());
        }

        tracing::error!(error = %err, "reporting error");

        let mut entry = ResultItem::drill(err.to_string(), "").with_icon(ERROR_ICON);
        if let Some(hint) = hint {
            entry = entry.with_subtitle(hint);
        }

        self.default = None;
        self.items = vec![entry];
        self.emit()
    }
}

impl fmt::Debug for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feedback")
            .field("default", &self.default)
            .field("items", &self.items)
            .field("emitted", &self.emitted.is_some())
            .finish_non_exhaustive()
    }
}
