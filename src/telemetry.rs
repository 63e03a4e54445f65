//! Tracing bootstrap for the wizard binary.
//!
//! `RUST_LOG` wins outright when set. Otherwise dependencies are held to
//! `warn` and this crate runs at the configured level, so keystroke-level
//! debug output from the verification flows stays opt-in.

use std::fmt;

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, AppEnvironment};

#[derive(Debug)]
pub enum TelemetryError {
    Filter { directives: String, source: ParseError },
    Install(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Filter { directives, .. } => {
                write!(f, "log filter '{directives}' does not parse")
            }
            TelemetryError::Install(err) => {
                write!(f, "failed to install the tracing subscriber: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Filter { source, .. } => Some(source),
            TelemetryError::Install(err) => Some(&**err),
        }
    }
}

pub fn init(config: &AppConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directives = default_directives(&config.telemetry.log_level);
            EnvFilter::try_new(&directives)
                .map_err(|source| TelemetryError::Filter { directives, source })?
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();

    // Plain output for anything that might end up in captured logs;
    // development keeps ANSI for the terminal.
    match config.environment {
        AppEnvironment::Development => builder.try_init(),
        AppEnvironment::Test | AppEnvironment::Production => builder.with_ansi(false).try_init(),
    }
    .map_err(TelemetryError::Install)
}

fn default_directives(level: &str) -> String {
    format!("warn,loan_intake={level}")
}
