//! Tracing subscriber setup

use crate::config::LogConfig;
use crate::error::AppError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Fallback when a directive does not parse
const FALLBACK_DIRECTIVE: &str = "warn";

/// Pick the filter directive: `RUST_LOG` wins over the configured one
#[must_use]
pub fn filter_directive(env: Option<&str>, config: &LogConfig) -> String {
    match env.map(str::trim) {
        Some(directive) if !directive.is_empty() => directive.to_string(),
        _ => config.filter.clone(),
    }
}

/// Build the filter, falling back to `warn` on a bad directive
#[must_use]
pub fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE))
}

/// Install the global subscriber. Logs go to stderr so rendered views on
/// stdout stay clean.
///
/// # Errors
/// `AppError::Logging` if a global subscriber is already set
pub fn init(config: &LogConfig) -> Result<(), AppError> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = env_filter(&filter_directive(env.as_deref(), config));

    let json = config
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let plain = (!config.json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_config() {
        let config = LogConfig {
            filter: "debug".into(),
            json: false,
        };
        assert_eq!(filter_directive(Some("tracker_store=trace"), &config), "tracker_store=trace");
        assert_eq!(filter_directive(Some("  "), &config), "debug");
        assert_eq!(filter_directive(None, &config), "debug");
    }

    #[test]
    fn bad_directive_falls_back() {
        let filter = env_filter("tracker_query=loudest");
        assert_eq!(filter.to_string(), FALLBACK_DIRECTIVE);
    }
}
