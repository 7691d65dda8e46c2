//! Storage layer for state that outlives one invocation.
//!
//! Two key-value stores are used: a persistent *data* store holding work timers
//! and ticket-list caches, and an ephemeral *session* store holding navigation
//! context (pending assignments) that the main menu clears.
//!
//! # Modules
//!
//! - `backend`: Key-value store trait and typed helpers
//! - `json`: JSON file store with atomic writes
//! - `memory`: In-process store
//! - `models`: Persisted record types
//! - `timer`: Work timer operations

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;
pub mod timer;

pub use backend::{get_typed, set_typed, KeyValueStore};
pub use json::JsonStore;
pub use memory::MemoryStore;
pub use models::{AssignContext, TimerRecord, TimerSnapshot};
pub use timer::TimerStore;
