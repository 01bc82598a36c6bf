/*!
 * Structured Tracing
 * Subscriber setup for the directory's tracing events
 */

use std::sync::Once;
use tracing::info;
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable that switches output to JSON
pub const TRACE_JSON_VAR: &str = "EXEC_UNITS_TRACE_JSON";

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - EXEC_UNITS_TRACE_JSON: Enable JSON output (default: false)
///
/// Only the first call installs a subscriber; later calls are no-ops, and
/// a subscriber installed by the embedding runtime is left in place.
pub fn init_tracing() {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let use_json = std::env::var(TRACE_JSON_VAR)
            .map(|v| v == "1" || v == "true")
            .unwrap_or(false);

        let registry = tracing_subscriber::registry().with(env_filter);

        let installed = if use_json {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_thread_names(true)
                        .with_current_span(true)
                        .with_span_list(true),
                )
                .try_init()
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_thread_names(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .compact(),
                )
                .try_init()
        };

        if installed.is_ok() {
            info!(json = use_json, "Structured tracing initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::debug!("still alive after double init");
    }
}
