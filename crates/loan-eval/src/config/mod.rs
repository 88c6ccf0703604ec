use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::scoring::EvaluationConfig;

/// Distinguishes runtime behavior for different stages of the service.
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
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub evaluation: EvaluationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            evaluation: load_evaluation_config()?,
        })
    }
}

fn load_evaluation_config() -> Result<EvaluationConfig, ConfigError> {
    let defaults = EvaluationConfig::default();

    let approval_max_risk = parse_var("LOAN_APPROVAL_MAX_RISK", defaults.approval_max_risk)?;
    if !(0.0..=1.0).contains(&approval_max_risk) {
        return Err(ConfigError::OutOfRange {
            variable: "LOAN_APPROVAL_MAX_RISK",
            expected: "a risk score between 0 and 1",
        });
    }

    let approval_min_credit = parse_var("LOAN_APPROVAL_MIN_CREDIT", defaults.approval_min_credit)?;

    let max_loan_amount = parse_var("LOAN_MAX_AMOUNT", defaults.max_loan_amount)?;
    if !(max_loan_amount.is_finite() && max_loan_amount > 0.0) {
        return Err(ConfigError::OutOfRange {
            variable: "LOAN_MAX_AMOUNT",
            expected: "a positive amount",
        });
    }

    let term_months = parse_var("LOAN_TERM_MONTHS", defaults.term_months)?;
    if term_months == 0 {
        return Err(ConfigError::OutOfRange {
            variable: "LOAN_TERM_MONTHS",
            expected: "at least one month",
        });
    }

    Ok(EvaluationConfig {
        approval_max_risk,
        approval_min_credit,
        max_loan_amount,
        term_months,
    })
}

fn parse_var<T: FromStr>(variable: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { variable, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { variable: &'static str, value: String },
    OutOfRange { variable: &'static str, expected: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable, value } => {
                write!(f, "{variable} must be numeric, got '{value}'")
            }
            ConfigError::OutOfRange { variable, expected } => {
                write!(f, "{variable} must be {expected}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::OutOfRange { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for variable in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "LOAN_APPROVAL_MAX_RISK",
            "LOAN_APPROVAL_MIN_CREDIT",
            "LOAN_MAX_AMOUNT",
            "LOAN_TERM_MONTHS",
        ] {
            env::remove_var(variable);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.evaluation, EvaluationConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_evaluation_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "ci");
        env::set_var("LOAN_APPROVAL_MAX_RISK", "0.45");
        env::set_var("LOAN_APPROVAL_MIN_CREDIT", "650");
        env::set_var("LOAN_TERM_MONTHS", " 36 ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(config.evaluation.approval_max_risk, 0.45);
        assert_eq!(config.evaluation.approval_min_credit, 650);
        assert_eq!(config.evaluation.term_months, 36);
        assert_eq!(config.evaluation.max_loan_amount, 500_000.0);
        reset_env();
    }

    #[test]
    fn rejects_invalid_evaluation_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("LOAN_MAX_AMOUNT", "lots");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidNumber {
                variable: "LOAN_MAX_AMOUNT",
                ..
            })
        ));

        reset_env();
        env::set_var("LOAN_APPROVAL_MAX_RISK", "1.5");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::OutOfRange {
                variable: "LOAN_APPROVAL_MAX_RISK",
                ..
            })
        ));
        reset_env();
    }
}
