//! Environment-driven exporter configuration.

use std::path::PathBuf;

use reqwest::Url;
use thiserror::Error;
use tracing::Level;

/// Prefix shared by all configuration variables.
const ENV_PREFIX: &str = "spc_";

/// Configuration errors. These fail process startup, never a scrape.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: String,
        value: String,
        reason: String,
    },
    #[error("validation error: {0}")]
    Validation(String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

/// Complete exporter configuration, resolved once at startup and passed
/// into the collector; there is no process-global settings object.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Stats endpoint of the service controller.
    pub service_controller: Url,

    /// Timeout for the controller fetch, in seconds.
    pub service_controller_timeout: u64,

    /// Path of the skupper CLI binary.
    pub skupper_binary: PathBuf,

    /// Wait budget handed to the CLI probe, in seconds.
    pub skupper_binary_timeout: u64,

    /// HTTP port for the metrics endpoint, bound on all interfaces.
    pub port: u16,

    /// Log level: "trace", "debug", "info", "warn", "error".
    pub log_level: String,

    /// Log output format: "text" or "json".
    pub log_format: LogFormat,
}

fn default_service_controller() -> Url {
    Url::parse("http://skupper-service-controller:8888/DATA")
        .expect("default controller URL is valid")
}

fn default_skupper_binary() -> PathBuf {
    PathBuf::from("/opt/skupper/skupper")
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            service_controller: default_service_controller(),
            service_controller_timeout: 5,
            skupper_binary: default_skupper_binary(),
            skupper_binary_timeout: 2,
            port: 8000,
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl ExporterConfig {
    /// Read configuration from `spc_`-prefixed process environment
    /// variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup. Tests use
    /// this to avoid mutating the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let get = |key: &str| lookup(&format!("{ENV_PREFIX}{key}"));

        if let Some(raw) = get("service_controller") {
            config.service_controller = Url::parse(&raw).map_err(|e| ConfigError::Invalid {
                var: var_name("service_controller"),
                value: raw.clone(),
                reason: e.to_string(),
            })?;
        }
        if let Some(raw) = get("service_controller_timeout") {
            config.service_controller_timeout = parse_var("service_controller_timeout", raw)?;
        }
        if let Some(raw) = get("skupper_binary") {
            config.skupper_binary = PathBuf::from(raw);
        }
        if let Some(raw) = get("skupper_binary_timeout") {
            config.skupper_binary_timeout = parse_var("skupper_binary_timeout", raw)?;
        }
        if let Some(raw) = get("port") {
            config.port = parse_var("port", raw)?;
        }
        if let Some(raw) = get("log_level") {
            config.log_level = raw;
        }
        if let Some(raw) = get("log_format") {
            config.log_format = match raw.to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: var_name("log_format"),
                        value: raw,
                        reason: "expected \"text\" or \"json\"".to_string(),
                    });
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_controller_timeout == 0 {
            return Err(ConfigError::Validation(format!(
                "{} must be > 0",
                var_name("service_controller_timeout")
            )));
        }

        if self.skupper_binary_timeout == 0 {
            return Err(ConfigError::Validation(format!(
                "{} must be > 0",
                var_name("skupper_binary_timeout")
            )));
        }

        if self.log_level.parse::<Level>().is_err() {
            return Err(ConfigError::Validation(format!(
                "{} must be one of trace, debug, info, warn, error",
                var_name("log_level")
            )));
        }

        Ok(())
    }
}

fn var_name(key: &str) -> String {
    format!("{ENV_PREFIX}{key}")
}

fn parse_var<T>(key: &str, raw: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var: var_name(key),
        value: raw,
        reason: e.to_string(),
    })
}
