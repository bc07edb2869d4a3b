//! # Telemetry
//!
//! Tracing subscriber setup shared by the binaries.
//!
//! - `RUST_LOG` overrides the default filter
//! - `MOTIFDEX_LOG_FORMAT=json` switches to machine-parseable output
//! - Logs share stdout with the progress lines, so warnings and fatal
//!   errors appear in step order

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV: &str = "MOTIFDEX_LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "motifdex=info,motifdex_core=info";

/// Install the global subscriber. Later calls are no-ops.
pub fn init() {
    let log_format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    let result = match log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init(),
    };
    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
