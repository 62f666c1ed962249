//! Logging Infrastructure
//!
//! Structured logging setup with env-filter support.

/// Initialize the logger
///
/// `RUST_LOG` overrides the default filter.
pub fn init_logger() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "haven_server=info,tower_http=info".into()),
        )
        .with_target(false)
        .init();
}
