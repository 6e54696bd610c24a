//! Telemetry helpers for structured logging and tracing.

/// Initialize tracing/telemetry. Users can install their own subscriber; this
/// helper installs a default env-based subscriber if none is set.
///
/// `debug` selects the default filter level (`debug` vs `info`) when
/// `RUST_LOG` is not set; a `.env` file is consulted for the variable first.
pub fn init_tracing(debug: bool) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let _ = dotenvy::dotenv();
    let default_filter = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
