//! Tracing/logging setup shared by storefront binaries and tests.

/// Environment-driven logging configuration.
pub mod config;

/// Tracing subscriber installation.
pub mod tracing;

pub use config::{LogFormat, LogFormatError, TracingConfig};

/// Initialize process-wide observability from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(&TracingConfig::from_env());
}
