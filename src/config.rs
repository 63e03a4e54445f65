use std::env;
use std::fmt;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub wizard: WizardConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let validation_delay = duration_var(
            "WIZARD_VALIDATION_DELAY_MS",
            WizardConfig::DEFAULT_VALIDATION_DELAY,
        )?;
        let notice_ttl = duration_var("WIZARD_NOTICE_TTL_MS", WizardConfig::DEFAULT_NOTICE_TTL)?;

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            wizard: WizardConfig {
                validation_delay,
                notice_ttl,
            },
        })
    }
}

fn duration_var(var: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    match env::var(var) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidDuration { var }),
    }
}

/// Tunables for the wizard's simulated collaborators.
#[derive(Debug, Clone, Copy)]
pub struct WizardConfig {
    /// Simulated identity-provider round trip before the OTP prompt opens.
    pub validation_delay: Duration,
    /// Lifetime of transient keystroke-rejection notices.
    pub notice_ttl: Duration,
}

impl WizardConfig {
    pub const DEFAULT_VALIDATION_DELAY: Duration = Duration::from_millis(1000);
    pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_millis(2000);
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            validation_delay: Self::DEFAULT_VALIDATION_DELAY,
            notice_ttl: Self::DEFAULT_NOTICE_TTL,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidDuration { var: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDuration { var } => {
                write!(f, "{var} must be a whole number of milliseconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
