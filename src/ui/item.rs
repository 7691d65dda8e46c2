//! Result entries handed to the launcher.
//!
//! A [`ResultItem`] is one row of the result list. It is either an *action*
//! (selectable; activating it hands its side-effect command to the executor) or
//! a *drill-down* (not selectable; activating it feeds its continuation back as
//! the next query). The constructors guarantee the matching field is present.

use serde::Serialize;
use std::collections::BTreeMap;

/// Modifier keys that can select an alternate variant of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Cmd,
    Alt,
    Ctrl,
    Shift,
}

/// Overrides applied while a modifier key is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierVariant {
    pub subtitle: Option<String>,
    pub command: Option<String>,
    pub selectable: bool,
}

impl ModifierVariant {
    /// A variant that runs `command` instead of the entry's own command.
    #[must_use]
    pub fn action(subtitle: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            subtitle: Some(subtitle.into()),
            command: Some(command.into()),
            selectable: true,
        }
    }
}

/// One entry of the result list.
///
/// # Examples
///
/// ```
/// use jiraflow::ui::{Modifier, ModifierVariant, ResultItem};
///
/// let item = ResultItem::drill("PROJ-1 (In Progress)", "in-progress › PROJ-1 › ")
///     .with_subtitle("12m")
///     .with_modifier(
///         Modifier::Cmd,
///         ModifierVariant::action("Stop progress without logging time", "clearProgress PROJ-1"),
///     );
/// assert!(!item.selectable);
/// assert!(item.is_consistent());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    pub title: String,
    pub subtitle: Option<String>,
    pub icon: Option<String>,
    pub selectable: bool,
    /// Next query when the user drills down (tab/autocomplete).
    pub continuation: Option<String>,
    /// Side-effect command run when the entry is activated.
    pub command: Option<String>,
    pub modifiers: BTreeMap<Modifier, ModifierVariant>,
}

impl ResultItem {
    /// A selectable entry that runs `command` when activated.
    #[must_use]
    pub fn action(title: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            icon: None,
            selectable: true,
            continuation: None,
            command: Some(command.into()),
            modifiers: BTreeMap::new(),
        }
    }

    /// A non-selectable entry that continues navigation at `continuation`.
    #[must_use]
    pub fn drill(title: impl Into<String>, continuation: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            icon: None,
            selectable: false,
            continuation: Some(continuation.into()),
            command: None,
            modifiers: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Adds a continuation to an action entry (used for tab completion).
    #[must_use]
    pub fn with_continuation(mut self, continuation: impl Into<String>) -> Self {
        self.continuation = Some(continuation.into());
        self
    }

    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier, variant: ModifierVariant) -> Self {
        self.modifiers.insert(modifier, variant);
        self
    }

    /// Selectable entries carry a command; the others carry a continuation.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        if self.selectable {
            self.command.is_some()
        } else {
            self.continuation.is_some()
        }
    }
}
