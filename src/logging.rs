//! # Structured logging
//!
//! The terminal itself only emits `tracing` events. Binaries, demos and
//! tests call [`init_logging`] once to install a subscriber; a second call,
//! or a subscriber installed by someone else, is tolerated.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Filter directives, first match wins.
pub const LOG_ENV_VARS: [&str; 2] = ["TICKET_TERMINAL_LOG", "RUST_LOG"];

/// Set to `json` for one JSON object per event.
pub const LOG_FORMAT_ENV_VAR: &str = "TICKET_TERMINAL_LOG_FORMAT";

const DEFAULT_DIRECTIVES: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV_VAR) {
            Ok(value) if value.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Install the global subscriber using the environment's filter and format.
pub fn init_logging() {
    init_logging_with(&log_directives(), LogFormat::from_env());
}

/// Install the global subscriber with explicit settings.
pub fn init_logging_with(directives: &str, format: LogFormat) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

        let layer = match format {
            LogFormat::Pretty => fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_filter(filter)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(false)
                .with_filter(filter)
                .boxed(),
        };

        // Someone else may already own the global subscriber; keep theirs.
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::debug!(?format, directives, "Logging initialized");
    });
}

fn log_directives() -> String {
    LOG_ENV_VARS
        .iter()
        .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_DIRECTIVES.to_string())
}
