//! Infrastructure layer for filesystem, process and time interactions.
//!
//! # Modules
//!
//! - [`paths`]: Data, cache and config locations
//! - [`clock`]: Injectable time source
//! - [`launcher`]: Background refresh spawning and URL opening

pub mod clock;
pub mod launcher;
pub mod paths;

pub use clock::{Clock, SystemClock};
pub use launcher::{Launcher, ProcessLauncher};
pub use paths::{get_cache_dir, get_data_dir};
