use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{LogFormat, LoggingConfig};

/// Directives appended to the configured level unless it already names the target
const QUIET_TARGETS: &[(&str, &str)] = &[("sqlx", "warn"), ("tower_http", "info")];

const FALLBACK_LEVEL: &str = "info";

/// Build the filter for the configured level.
///
/// `RUST_LOG` wins when set. Otherwise the level is used as a directive
/// string, falling back to `info` when it does not parse.
pub fn build_filter(level: &str, env_override: Option<&str>) -> EnvFilter {
    if let Some(filter) = env_override.and_then(|value| EnvFilter::try_new(value).ok()) {
        return filter;
    }

    let mut directives = level.trim().to_string();
    if directives.is_empty() || EnvFilter::try_new(&directives).is_err() {
        directives = FALLBACK_LEVEL.to_string();
    }

    for (target, target_level) in QUIET_TARGETS {
        if !directives.contains(target) {
            directives.push_str(&format!(",{}={}", target, target_level));
        }
    }

    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}

/// Install the global tracing subscriber. A second call is a no-op.
pub fn init_logging(config: &LoggingConfig) {
    let env_override = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(&config.level, env_override.as_deref());

    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_span_events(FmtSpan::CLOSE))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty().with_target(true))
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(level = %config.level, format = ?config.format, "Logging initialized");
    }
}
