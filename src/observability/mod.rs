//! File-based logging.
//!
//! Every invocation is a short-lived process whose stdout is the result
//! document, so log output is written to a size-rotated file in the workflow
//! data directory instead.
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter → jiraflow.log
//! ```
//!
//! # Configuration
//!
//! The level is controlled via:
//! 1. `JIRAFLOW_LOG` environment variable (highest priority)
//! 2. `log_level` in `config.toml`
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

pub mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::{init_logging, LOG_FILE_NAME};
