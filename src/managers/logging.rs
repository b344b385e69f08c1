//! Console logging setup
//!
//! Diagnostics go to the console only; the append-mode log files under
//! `backup.log_dir` are written by the command runner per operation.

use tracing_subscriber::EnvFilter;

/// Initialize console logging, honoring `RUST_LOG` when set
pub fn init_console_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();
}
