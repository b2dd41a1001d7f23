//! Tracing subscriber bootstrap for test runs.
//!
//! Filtering follows `RUST_LOG` when set (`RUST_LOG=rotulo=debug` shows
//! every poll attempt and swallowed driver failure), otherwise the given
//! default directive.

use crate::result::{RotuloError, RotuloResult};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Output format of the subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Build the filter: `RUST_LOG` wins over `default_directive`
pub fn env_filter(default_directive: &str) -> RotuloResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive)
            .map_err(|e| RotuloError::init(format!("invalid log filter '{default_directive}': {e}"))),
    }
}

/// Install a global subscriber
///
/// Returns `false` when a subscriber was already installed, which is
/// normal when several test binaries share a process.
pub fn init_tracing(format: LogFormat, default_directive: &str) -> RotuloResult<bool> {
    let filter = env_filter(default_directive)?;
    let installed = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_test_writer())
            .try_init(),
    };
    Ok(installed.is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_directive_rejected() {
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(env_filter("rotulo=loud").is_err());
        }
    }

    #[test]
    fn test_second_init_reports_existing_subscriber() {
        let _ = init_tracing(LogFormat::Json, "rotulo=debug").unwrap();
        assert!(!init_tracing(LogFormat::Pretty, "info").unwrap());
        tracing::info!(target: "rotulo", "subscriber active");
    }
}
