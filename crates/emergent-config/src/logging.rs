//! Structured JSON logging to stderr.
//!
//! Standard output is reserved for JSON-RPC traffic in stdio mode, so all
//! logging — regardless of transport — goes to stderr.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Initialize the global tracing subscriber. Call once at startup.
///
/// `level` is the configured `log.level` knob (debug/info/warn/error);
/// `RUST_LOG` still takes precedence if set, matching `tracing_subscriber`'s
/// usual convention.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    let _ = tracing_subscriber::registry().with(layer).try_init();
}
