//! Logging initialization and subscriber setup.

use super::file_writer::FileWriter;
use crate::Config;
use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the log file inside the data directory.
pub const LOG_FILE_NAME: &str = "jiraflow.log";

/// Initializes the tracing subscriber writing to a rotating log file.
///
/// The filter comes from `config.log_level` (already overridden by
/// `JIRAFLOW_LOG` when the config was loaded), defaulting to `"info"`. Output
/// goes to `<data_dir>/jiraflow.log` without ANSI colors.
///
/// # Initialization Behavior
///
/// - Creates the data directory if it doesn't exist
/// - Silently gives up if the directory cannot be created (logging is optional)
/// - Idempotent: only the first call installs a subscriber
pub fn init_logging(config: &Config, data_dir: &Path) {
    if std::fs::create_dir_all(data_dir).is_err() {
        return;
    }

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let writer = FileWriter::new(data_dir.join(LOG_FILE_NAME));

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
