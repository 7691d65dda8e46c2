//! Navigation path codec.
//!
//! The launcher only hands the workflow one string per keystroke, so the menu
//! hierarchy is encoded into that string as segments joined by `›`:
//!
//! ```text
//! assign › PROJ-12 › al
//! └─────┘  └─────┘   └┘
//! parent   context   filter
//! ```
//!
//! The last segment is always the live filter term (possibly empty); the one
//! before it names the context the filter applies to. Handlers never edit
//! segments, they re-encode them to build the continuation of an entry.

/// Segment separator.
pub const SEPARATOR: char = '›';

const JOINER: &str = " › ";

/// Joins segments with the separator.
///
/// `decode(&encode(s)) == s` for any non-empty sequence of trimmed segments
/// that do not contain the separator.
#[must_use]
pub fn encode<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(JOINER)
}

/// Continuation that descends into `segments` with an empty filter.
///
/// This is `encode(segments)` followed by a trailing separator, so the next
/// invocation decodes to `segments` plus an empty filter term. No segments
/// yields the empty query, which is the main menu.
///
/// ```
/// use jiraflow::app::path::{decode, path};
///
/// assert_eq!(path(&["assign", "PROJ-1"]), "assign › PROJ-1 › ");
/// assert_eq!(decode(&path(&["assign", "PROJ-1"])), ["assign", "PROJ-1", ""]);
/// ```
#[must_use]
pub fn path<S: AsRef<str>>(segments: &[S]) -> String {
    if segments.is_empty() {
        return String::new();
    }
    let mut continuation = encode(segments);
    continuation.push_str(JOINER);
    continuation
}

/// Splits a raw query into trimmed segments.
///
/// Empty segments are kept, so a trailing separator produces an empty filter
/// term. A query without separators decodes to one segment.
#[must_use]
pub fn decode(raw: &str) -> Vec<String> {
    raw.split(SEPARATOR).map(|s| s.trim().to_string()).collect()
}

/// A decoded query with accessors for its filter, context and parents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationContext {
    segments: Vec<String>,
}

impl NavigationContext {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            segments: decode(raw),
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The live filter term: the last segment.
    #[must_use]
    pub fn filter(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// The segment before the filter, if any.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        let len = self.segments.len();
        (len >= 2).then(|| self.segments[len - 2].as_str())
    }

    /// Every segment before the context.
    #[must_use]
    pub fn parents(&self) -> &[String] {
        let len = self.segments.len();
        &self.segments[..len.saturating_sub(2)]
    }

    /// Everything except the filter: the menu the user is currently in.
    #[must_use]
    pub fn location(&self) -> &[String] {
        let len = self.segments.len();
        &self.segments[..len.saturating_sub(1)]
    }
}
