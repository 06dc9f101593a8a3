use crate::grading::{
    GradingPolicy, SgpaWeighting, DEFAULT_COURSE_PASS_POINT, DEFAULT_OVERALL_PASS_CGPA,
    DEFAULT_WEIGHT_TOLERANCE,
};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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
    pub grading: GradingConfig,
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

        let grading = GradingConfig {
            course_pass_point: number_var("APP_COURSE_PASS_POINT", DEFAULT_COURSE_PASS_POINT)?,
            overall_pass_cgpa: number_var("APP_OVERALL_PASS_CGPA", DEFAULT_OVERALL_PASS_CGPA)?,
            weight_tolerance: number_var("APP_WEIGHT_TOLERANCE", DEFAULT_WEIGHT_TOLERANCE)?,
            sgpa_weighting: match env::var("APP_SGPA_WEIGHTING") {
                Ok(raw) => SgpaWeighting::parse(&raw)
                    .ok_or(ConfigError::InvalidSgpaWeighting { value: raw })?,
                Err(_) => SgpaWeighting::Unweighted,
            },
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            grading,
        })
    }
}

fn number_var(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or(ConfigError::InvalidNumber { key, value: raw }),
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

/// Pass thresholds and defaults applied by the grade engine.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingConfig {
    pub course_pass_point: f64,
    pub overall_pass_cgpa: f64,
    pub weight_tolerance: f64,
    pub sgpa_weighting: SgpaWeighting,
}

impl GradingConfig {
    pub fn policy(&self) -> GradingPolicy {
        GradingPolicy {
            course_pass_point: self.course_pass_point,
            overall_pass_cgpa: self.overall_pass_cgpa,
            weight_tolerance: self.weight_tolerance,
            sgpa_weighting: self.sgpa_weighting,
            ..GradingPolicy::standard()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    InvalidSgpaWeighting { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a non-negative number, got '{value}'")
            }
            ConfigError::InvalidSgpaWeighting { value } => write!(
                f,
                "APP_SGPA_WEIGHTING must be 'unweighted' or 'credit_weighted', got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidSgpaWeighting { .. } => None,
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
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_COURSE_PASS_POINT",
            "APP_OVERALL_PASS_CGPA",
            "APP_WEIGHT_TOLERANCE",
            "APP_SGPA_WEIGHTING",
        ] {
            env::remove_var(key);
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
        assert_eq!(config.grading.policy(), GradingPolicy::standard());
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
    fn grading_overrides_flow_into_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_OVERALL_PASS_CGPA", "6");
        env::set_var("APP_SGPA_WEIGHTING", "credit-weighted");
        let config = AppConfig::load().expect("config loads");
        let policy = config.grading.policy();
        assert_eq!(policy.overall_pass_cgpa, 6.0);
        assert_eq!(policy.course_pass_point, DEFAULT_COURSE_PASS_POINT);
        assert_eq!(policy.sgpa_weighting, SgpaWeighting::CreditWeighted);
        reset_env();
    }

    #[test]
    fn rejects_unparseable_grading_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_COURSE_PASS_POINT", "four");
        let err = AppConfig::load().expect_err("invalid number rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                key: "APP_COURSE_PASS_POINT",
                ..
            }
        ));
        reset_env();

        env::set_var("APP_SGPA_WEIGHTING", "by-vibes");
        let err = AppConfig::load().expect_err("invalid weighting rejected");
        assert!(err.to_string().contains("by-vibes"));
        reset_env();
    }
}
