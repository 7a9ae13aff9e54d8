//! Logging utilities
//!
//! Provides logging setup and configuration.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Setup logging for the server.
///
/// The configured level applies unless `RUST_LOG` is set, which takes precedence.
pub fn setup_logging(level: LevelFilter) {
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .format_timestamp_millis()
        .parse_env(Env::default());

    if let Err(e) = builder.try_init() {
        eprintln!("Logger already initialized: {e}");
    }
}
