use fce_srs::Scheduler;
use serde::Deserialize;
use thiserror::Error;

/// Deployment environment, selects the log format among other things
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment error: {0}")]
    Env(#[from] envy::Error),
    #[error("UTC_OFFSET_MINUTES must be within one day of UTC, got {0}")]
    InvalidUtcOffset(i32),
    #[error("MAX_DB_CONNECTIONS must be at least 1")]
    NoConnections,
}

/// Service configuration, read from environment variables.
///
/// Every variable is optional; see the `default_*` functions for fallbacks.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    /// `DATABASE_URL`, a SQLite connection string
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// `HOST`
    #[serde(default = "default_host")]
    pub host: String,
    /// `PORT`
    #[serde(default = "default_port")]
    pub port: u16,
    /// `ENVIRONMENT`, `development` or `production`
    #[serde(default, rename = "environment")]
    pub env: Environment,
    /// `ALLOWED_ORIGINS`, comma separated; empty allows any origin
    #[serde(default)]
    pub allowed_origins: String,
    /// `UTC_OFFSET_MINUTES`, where the learner's day starts relative to UTC
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// `MAX_DB_CONNECTIONS`
    #[serde(default = "default_max_db_connections")]
    pub max_db_connections: u32,
}

fn default_database_url() -> String {
    "sqlite://flashcards.db".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_db_connections() -> u32 {
    5
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::validated(envy::from_env()?)
    }

    /// Build a configuration from explicit `(NAME, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self::validated(envy::from_iter(vars)?)
    }

    fn validated(config: Self) -> Result<Self, ConfigError> {
        if config.max_db_connections == 0 {
            return Err(ConfigError::NoConnections);
        }
        config.scheduler()?;
        Ok(config)
    }

    pub fn scheduler(&self) -> Result<Scheduler, ConfigError> {
        Scheduler::from_offset_minutes(self.utc_offset_minutes)
            .ok_or(ConfigError::InvalidUtcOffset(self.utc_offset_minutes))
    }

    pub fn parsed_allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
