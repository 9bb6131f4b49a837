//! Logging setup for so3-diff demos and downstream binaries
//!
//! The library itself only emits `debug!`/`trace!` events and never installs a subscriber.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber with a default level of INFO
///
/// The level can be overridden via the `RUST_LOG` environment variable:
/// ```bash
/// RUST_LOG=so3_diff=debug cargo run --example rotation_averaging
/// ```
///
/// # Example
/// ```no_run
/// use so3_diff::init_logger;
///
/// init_logger();
/// tracing::info!("Averaging started");
/// ```
pub fn init_logger() {
    init_logger_with_level(Level::INFO)
}

/// Initialize the tracing subscriber with a custom default level
///
/// Repeated calls are harmless: only the first one installs the subscriber.
///
/// # Arguments
/// * `default_level` - The default log level (overrideable via RUST_LOG)
pub fn init_logger_with_level(default_level: Level) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed, keeping it");
    }
}

/// `RUST_LOG` directives on top of `default_level`; unparsable directives are skipped.
fn env_filter(default_level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}
