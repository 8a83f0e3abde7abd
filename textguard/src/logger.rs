// textguard/src/logger.rs
//! Logger setup for the CLI.
//! License: MIT OR APACHE 2.0

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes `env_logger` on stderr.
///
/// `level`, when given, replaces the default level from `RUST_LOG`.
/// Without either, only warnings and errors are shown. Calling this more
/// than once is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).format_target(false);
    let _ = builder.try_init();
}
