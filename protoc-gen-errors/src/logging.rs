//! Diagnostics go to stderr; stdout carries the plugin response.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "PROTOC_GEN_ERRORS_LOG";

/// Install the stderr subscriber, filtered by `PROTOC_GEN_ERRORS_LOG`
///
/// Defaults to `warn`. Calling this twice is harmless.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
