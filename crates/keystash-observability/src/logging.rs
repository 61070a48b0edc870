use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact human-readable lines with ANSI colors.
    #[default]
    Compact,
    /// One JSON object per line, with the current span and span list.
    Json,
}

impl LogFormat {
    /// Reads `LOG_FORMAT`; anything other than `json` selects compact output.
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Builds the default filter directive for a log level.
///
/// Keystash crates log at `level`; the Redis client and pool are held at `warn`.
pub fn default_directive(level: &str) -> String {
    format!(
        "keystash={level},keystash_cache={level},keystash_cli={level},redis=warn,deadpool=warn"
    )
}

/// Initialize console logging.
///
/// # Configuration
///
/// - **Filter**: `RUST_LOG` when set, otherwise `LOG_LEVEL` (default: "info")
///   applied to the keystash crates
/// - **Format**: `LOG_FORMAT=json` for structured output, compact otherwise
/// - **Target**: Shows module paths (e.g., "keystash_cache::redis::strings")
///
/// Calling it twice is harmless: the second call leaves the installed
/// subscriber in place and returns `false`.
pub fn init_logging() -> bool {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&log_level)));

    let layer = match LogFormat::from_env() {
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(env_filter))
        .try_init()
        .is_ok()
}
