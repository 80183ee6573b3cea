//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the process. Filtering comes from RUST_LOG and
/// defaults to `info`. Set TRACKLINE_LOG_JSON=1 for structured output.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let json = std::env::var("TRACKLINE_LOG_JSON").is_ok_and(|v| v == "1");
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}
