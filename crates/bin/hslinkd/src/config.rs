//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `hslink.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hub connection settings.
    pub hub: HubConfig,
    /// Snapshot files to seed the device table from.
    pub snapshot: SnapshotConfig,
    /// Update listener behaviour.
    pub listener: ListenerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Where the hub lives and how to log into it.
///
/// Reserved for a real hub transport: the virtual hub ignores these, so today
/// they are only validated and logged at startup.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub host: String,
    /// Port of the JSON API.
    pub http_port: u16,
    /// Port of the ASCII push channel.
    pub ascii_port: u16,
    pub username: String,
    pub password: String,
}

/// `getstatus` / `getcontrol` bodies saved to disk.
///
/// When both are absent the demo device set is used instead.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub status_path: Option<PathBuf>,
    pub control_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Keep observers quiet on listener connect/disconnect.
    pub suppress_on_connection: bool,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `hslink.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("hslink.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HSLINK_HOST") {
            self.hub.host = val;
        }
        if let Ok(val) = std::env::var("HSLINK_HTTP_PORT")
            && let Ok(port) = val.parse()
        {
            self.hub.http_port = port;
        }
        if let Ok(val) = std::env::var("HSLINK_ASCII_PORT")
            && let Ok(port) = val.parse()
        {
            self.hub.ascii_port = port;
        }
        if let Ok(val) = std::env::var("HSLINK_USERNAME") {
            self.hub.username = val;
        }
        if let Ok(val) = std::env::var("HSLINK_PASSWORD") {
            self.hub.password = val;
        }
        if let Ok(val) = std::env::var("HSLINK_STATUS_PATH") {
            self.snapshot.status_path = Some(val.into());
        }
        if let Ok(val) = std::env::var("HSLINK_CONTROL_PATH") {
            self.snapshot.control_path = Some(val.into());
        }
        if let Ok(val) = std::env::var("HSLINK_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.hub.host.trim().is_empty() {
            return Err(ConfigError::Validation("hub host must not be empty".to_string()));
        }
        if self.hub.http_port == 0 {
            return Err(ConfigError::Validation("http port must be non-zero".to_string()));
        }
        if self.hub.ascii_port == 0 {
            return Err(ConfigError::Validation("ascii port must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Base URL of the hub's JSON API.
    #[must_use]
    pub fn json_api_url(&self) -> String {
        format!("http://{}:{}/JSON", self.hub.host, self.hub.http_port)
    }

    /// `host:port` of the ASCII push channel.
    #[must_use]
    pub fn ascii_addr(&self) -> String {
        format!("{}:{}", self.hub.host, self.hub.ascii_port)
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            http_port: 80,
            ascii_port: 11000,
            username: "default".to_string(),
            password: "default".to_string(),
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            suppress_on_connection: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "hslinkd=info,hslink_app=info,hslink_adapter_virtual=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
