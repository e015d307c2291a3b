//! Logging bootstrap

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `debug` raises the filter
/// from the default `info` level. Safe to call more than once — later
/// calls are no-ops.
pub fn init(debug: bool) {
    let default_filter = if debug { "tapedeck=debug" } else { "tapedeck=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
