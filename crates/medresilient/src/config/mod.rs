use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::resupply::ScoreWeights;

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
    pub recommendations: RecommendationConfig,
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

        let recommendations = RecommendationConfig::from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            recommendations,
        })
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Session defaults handed to the recommendation service at startup.
#[derive(Debug, Clone)]
pub struct RecommendationConfig {
    pub weights: ScoreWeights,
    pub default_limit: i64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            default_limit: crate::workflows::resupply::DEFAULT_RANK_LIMIT,
        }
    }
}

impl RecommendationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("APP_DEFAULT_ALPHA") {
            let alpha = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidAlpha { value: raw.clone() })?;
            config
                .weights
                .set_alpha(alpha)
                .map_err(|_| ConfigError::InvalidAlpha { value: raw.clone() })?;
        }

        if let Ok(raw) = env::var("APP_RECOMMENDATION_LIMIT") {
            config.default_limit = raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidLimit { value: raw.clone() })?;
        }

        Ok(config)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidAlpha { value: String },
    InvalidLimit { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidAlpha { value } => {
                write!(f, "APP_DEFAULT_ALPHA must be a number in [0, 1], got '{value}'")
            }
            ConfigError::InvalidLimit { value } => {
                write!(f, "APP_RECOMMENDATION_LIMIT must be a positive integer, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidAlpha { .. }
            | ConfigError::InvalidLimit { .. } => None,
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
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_DEFAULT_ALPHA");
        env::remove_var("APP_RECOMMENDATION_LIMIT");
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
        assert_eq!(config.recommendations.default_limit, 5);
        assert!((config.recommendations.weights.alpha() - 0.6).abs() < 1e-9);
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
    fn default_alpha_override_rederives_beta() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_DEFAULT_ALPHA", "0.25");
        let config = AppConfig::load().expect("config loads");
        assert!((config.recommendations.weights.alpha() - 0.25).abs() < 1e-9);
        assert!((config.recommendations.weights.beta() - 0.75).abs() < 1e-9);
        reset_env();
    }

    #[test]
    fn rejects_out_of_range_alpha_and_non_positive_limit() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_DEFAULT_ALPHA", "1.5");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidAlpha { .. })
        ));

        reset_env();
        env::set_var("APP_RECOMMENDATION_LIMIT", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidLimit { .. })
        ));
        reset_env();
    }
}
