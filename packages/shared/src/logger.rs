//! Logging setup utilities for the room chat server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// This function sets up logging for the server library crate, the shared crate
/// and the binary. The log level can be overridden using the `RUST_LOG`
/// environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "roomchat-server")
/// * `default_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use roomchat_shared::logger::setup_logger;
///
/// setup_logger("roomchat-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    tracing::debug!("Logger initialized for '{}'", binary_name);
}

/// Build the default `EnvFilter` directive used when `RUST_LOG` is not set.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "{}={},roomchat_server={},{}={},tower_http={}",
        env!("CARGO_PKG_NAME").replace('-', "_"),
        default_log_level,
        default_log_level,
        binary_name.replace('-', "_"),
        default_log_level,
        default_log_level,
    )
}
