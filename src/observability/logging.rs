//! Structured logging setup.
//!
//! Uses the tracing crate. The filter comes from `RUST_LOG` when set and
//! falls back to the configured level otherwise.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ObservabilityConfig;

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once per process; later calls are ignored.
pub fn init(config: &ObservabilityConfig) {
    let default_filter = format!(
        "http_relay={level},tower_http={level}",
        level = config.log_level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
