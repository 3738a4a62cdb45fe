//! Run configuration loaded from `config.yml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::Level;

use crate::adapters::{DEFAULT_STATCAST_BASE_URL, DEFAULT_STATS_BASE_URL};
use crate::domain::{parse_date, DateRange};
use crate::retry::RetryPolicy;
use crate::throttling::RateLimiter;
use crate::ValidationError;

pub const DEFAULT_CONFIG_PATH: &str = "config.yml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub statcast: StatcastConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExtractionConfig {
    pub season: i64,
    #[serde(default = "default_sport_id")]
    pub sport_id: i64,
    #[serde(default = "default_game_types")]
    pub game_types: Vec<String>,
}

/// Delays in seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_request_delay")]
    pub request_delay: f64,
    #[serde(default = "default_statcast_delay")]
    pub statcast_delay: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            request_delay: default_request_delay(),
            statcast_delay: default_statcast_delay(),
        }
    }
}

impl RateLimitConfig {
    pub fn api_limiter(&self) -> RateLimiter {
        RateLimiter::from_secs_f64(self.request_delay)
    }

    pub fn statcast_limiter(&self) -> RateLimiter {
        RateLimiter::from_secs_f64(self.statcast_delay)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_factor: default_backoff_factor(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.backoff_factor)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatcastConfig {
    #[serde(default = "default_statcast_start")]
    pub start_date: String,
    #[serde(default = "default_statcast_end")]
    pub end_date: String,
    #[serde(default = "default_chunk_days")]
    pub chunk_days: u32,
}

impl Default for StatcastConfig {
    fn default() -> Self {
        Self {
            start_date: default_statcast_start(),
            end_date: default_statcast_end(),
            chunk_days: default_chunk_days(),
        }
    }
}

impl StatcastConfig {
    pub fn date_range(&self) -> Result<DateRange, ValidationError> {
        let start = parse_date("statcast.start_date", &self.start_date)?;
        let end = parse_date("statcast.end_date", &self.end_date)?;
        DateRange::new(start, end, self.chunk_days)
    }
}

/// Storage settings. The warehouse is an embedded file, so the networked
/// keys are read but have no effect.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_dbname")]
    pub dbname: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            dbname: default_dbname(),
            host: None,
            port: None,
            user: None,
            password: None,
        }
    }
}

impl DatabaseConfig {
    pub fn db_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from("data").join(format!("{}.duckdb", self.dbname)))
    }

    /// Networked connection keys present in the file.
    pub fn ignored_keys(&self) -> Vec<&'static str> {
        [
            ("host", self.host.is_some()),
            ("port", self.port.is_some()),
            ("user", self.user.is_some()),
            ("password", self.password.is_some()),
        ]
        .into_iter()
        .filter_map(|(key, present)| present.then_some(key))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_stats_base_url")]
    pub stats_base_url: String,
    #[serde(default = "default_statcast_base_url")]
    pub statcast_base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            stats_base_url: default_stats_base_url(),
            statcast_base_url: default_statcast_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn level(&self) -> Result<Level, ValidationError> {
        match self.level.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Level::TRACE),
            "DEBUG" => Ok(Level::DEBUG),
            "INFO" => Ok(Level::INFO),
            "WARN" | "WARNING" => Ok(Level::WARN),
            "ERROR" | "CRITICAL" => Ok(Level::ERROR),
            _ => Err(ValidationError::InvalidLogLevel {
                value: self.level.clone(),
            }),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.extraction.season <= 0 {
            return Err(ValidationError::ZeroValue {
                field: "extraction.season",
            });
        }
        let game_types = &self.extraction.game_types;
        if game_types.is_empty() || game_types.iter().any(|t| t.trim().is_empty()) {
            return Err(ValidationError::EmptyGameTypes);
        }
        check_delay("rate_limit.request_delay", self.rate_limit.request_delay)?;
        check_delay("rate_limit.statcast_delay", self.rate_limit.statcast_delay)?;
        check_delay("retry.backoff_factor", self.retry.backoff_factor)?;
        if self.retry.max_retries == 0 {
            return Err(ValidationError::ZeroValue {
                field: "retry.max_retries",
            });
        }
        if self.api.timeout_ms == 0 {
            return Err(ValidationError::ZeroValue {
                field: "api.timeout_ms",
            });
        }
        self.statcast.date_range()?;
        self.logging.level()?;
        Ok(())
    }
}

fn check_delay(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

fn default_sport_id() -> i64 {
    1
}

fn default_game_types() -> Vec<String> {
    vec![String::from("R")]
}

fn default_request_delay() -> f64 {
    1.0
}

fn default_statcast_delay() -> f64 {
    2.0
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_factor() -> f64 {
    2.0
}

fn default_statcast_start() -> String {
    String::from("2024-03-28")
}

fn default_statcast_end() -> String {
    String::from("2024-09-29")
}

fn default_chunk_days() -> u32 {
    5
}

fn default_dbname() -> String {
    String::from("mlb")
}

fn default_stats_base_url() -> String {
    String::from(DEFAULT_STATS_BASE_URL)
}

fn default_statcast_base_url() -> String {
    String::from(DEFAULT_STATCAST_BASE_URL)
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_log_level() -> String {
    String::from("INFO")
}
