use std::time::Duration;

use thiserror::Error;

use health_panel_domain::services::ServiceConfig;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Runtime configuration read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `PORT`
    pub port: u16,
    /// `APP_ENV`
    pub environment: String,
    /// `FILE_TIMEOUT_SECS`
    pub file_timeout: Duration,
    /// `MAX_UPLOAD_MB`, in bytes
    pub max_upload_bytes: usize,
    /// `SYNTHESIS_SEED`
    pub synthesis_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            environment: "development".to_string(),
            file_timeout: Duration::from_secs(30),
            max_upload_bytes: 50 * 1024 * 1024,
            synthesis_seed: None,
        }
    }
}

impl AppConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = parse_var(&lookup, "PORT")?.unwrap_or(defaults.port);
        let environment = lookup("APP_ENV").unwrap_or(defaults.environment);
        let file_timeout = parse_var::<u64>(&lookup, "FILE_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.file_timeout);
        let max_upload_bytes = parse_var::<usize>(&lookup, "MAX_UPLOAD_MB")?
            .map(|mb| mb.saturating_mul(1024 * 1024))
            .unwrap_or(defaults.max_upload_bytes);
        let synthesis_seed = parse_var(&lookup, "SYNTHESIS_SEED")?;

        Ok(Self {
            port,
            environment,
            file_timeout,
            max_upload_bytes,
            synthesis_seed,
        })
    }

    /// Settings handed to the record service
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            file_timeout: self.file_timeout,
            synthesis_seed: self.synthesis_seed,
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}
