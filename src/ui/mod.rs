//! Result list output.
//!
//! Handlers describe what the user should see as [`ResultItem`]s; the
//! [`Feedback`] accumulator collects them and renders the launcher's
//! script-filter JSON exactly once per invocation.
//!
//! ```text
//! handler → Feedback (default + items) → render → {"items": [...]} on stdout
//! ```
//!
//! # Modules
//!
//! - [`item`]: Result entries and modifier variants
//! - [`feedback`]: The accumulator with its single error boundary hook
//! - [`renderer`]: Script-filter JSON serialization

pub mod feedback;
pub mod item;
pub mod renderer;

pub use feedback::{Emission, Feedback, ERROR_ICON};
pub use item::{Modifier, ModifierVariant, ResultItem};
pub use renderer::render;
