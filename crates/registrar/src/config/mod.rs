use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::academics::enrollment::{EligibilityConfig, ExamPolicy, Grade};

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
    pub policy: PolicyConfig,
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

        let exam_policy = env::var("APP_EXAM_POLICY")
            .map(|value| parse_exam_policy(&value))
            .unwrap_or_default();
        let passing_grade = match env::var("APP_PASSING_GRADE") {
            Ok(raw) => raw
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(|value| Grade::new(value).ok())
                .ok_or(ConfigError::InvalidPassingGrade { value: raw })?,
            Err(_) => Grade::DEFAULT_MINIMUM,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            policy: PolicyConfig {
                exam_policy,
                passing_grade,
            },
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Eligibility policy dials exposed through the environment.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    pub exam_policy: ExamPolicy,
    pub passing_grade: Grade,
}

impl PolicyConfig {
    pub fn eligibility_config(&self) -> EligibilityConfig {
        EligibilityConfig {
            exam_policy: self.exam_policy,
            passing_grade: self.passing_grade,
        }
    }
}

fn parse_exam_policy(value: &str) -> ExamPolicy {
    match value.trim().to_ascii_lowercase().as_str() {
        "deferrable" | "deferrablebyexam" | "deferrable_by_exam" => ExamPolicy::DeferrableByExam,
        _ => ExamPolicy::Blocking,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPassingGrade { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPassingGrade { value } => {
                write!(f, "APP_PASSING_GRADE must be an integer on the 1-5 scale, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidPassingGrade { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
