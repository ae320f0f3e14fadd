//! Logging and tracing initialization for TapCard.
//!
//! The log level is controlled by the `RUST_LOG` environment variable:
//!
//! ```bash
//! # Show all logs including request traces
//! RUST_LOG=debug tapcard
//!
//! # Fine-grained control
//! RUST_LOG=tapcard=debug,tower_http=debug,sqlx=warn tapcard
//! ```
//!
//! `LOG_FORMAT=json` switches to JSON lines for log aggregation.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Initialize logging with sensible defaults (`info` unless `RUST_LOG` is set).
///
/// # Panics
///
/// Panics if a global subscriber is already installed. Call once at startup.
pub fn init_logging() {
    init_logging_with_level("info");
}

/// Initialize logging with a specific default level.
///
/// `RUST_LOG` still wins when present.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize JSON-formatted logging (recommended for production).
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// Pick the subscriber matching `LOG_FORMAT`.
pub fn init_from_config(config: &Config) {
    if config.is_json_logging() {
        init_logging_json();
    } else {
        init_logging();
    }
}
