use core::fmt;
use core::str::FromStr;

use thiserror::Error;

/// Filter directive, e.g. `storefront_products=debug,info`.
pub const FILTER_VAR: &str = "STOREFRONT_LOG";

/// Output format: `json`, `pretty` or `compact`.
pub const FORMAT_VAR: &str = "STOREFRONT_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON lines with timestamps.
    #[default]
    Json,
    Pretty,
    Compact,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown log format `{0}` (expected json, pretty or compact)")]
pub struct LogFormatError(String);

impl FromStr for LogFormat {
    type Err = LogFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            _ => Err(LogFormatError(s.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        })
    }
}

/// Tracing settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub filter: String,
    pub format: LogFormat,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl TracingConfig {
    /// Read `STOREFRONT_LOG` (falling back to `RUST_LOG`) and `STOREFRONT_LOG_FORMAT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`; unknown formats fall back to JSON.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let filter = lookup(FILTER_VAR)
            .or_else(|| lookup("RUST_LOG"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        let format = lookup(FORMAT_VAR)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        Self { filter, format }
    }
}
