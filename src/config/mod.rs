//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files
//! - Environment variables

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AmqpError, Result};

/// Default maximum channel number (AMQP 1.0 `channel-max` default)
pub const DEFAULT_CHANNEL_MAX: u16 = 32767;

/// Default maximum link handle (AMQP 1.0 `handle-max` default)
pub const DEFAULT_HANDLE_MAX: u32 = u32::MAX;

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Connection configuration
    #[serde(default)]
    pub connection: ConnectionConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from environment variables.
    ///
    /// Unset variables keep their defaults; a value that does not parse is a
    /// [`AmqpError::Config`] error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(id) = std::env::var("AMQP_CONTAINER_ID") {
            config.connection.container_id = Some(id);
        }
        if let Ok(host) = std::env::var("AMQP_HOSTNAME") {
            config.connection.hostname = Some(host);
        }
        if let Some(max) = env_number("AMQP_CHANNEL_MAX")? {
            config.connection.channel_max = max;
        }
        if let Some(max) = env_number("AMQP_HANDLE_MAX")? {
            config.connection.handle_max = max;
        }

        Ok(config)
    }

    /// Merge with another config (other takes precedence where it differs
    /// from the defaults)
    pub fn merge(self, other: Self) -> Self {
        let defaults = ConnectionConfig::default();
        Self {
            connection: ConnectionConfig {
                container_id: other.connection.container_id.or(self.connection.container_id),
                hostname: other.connection.hostname.or(self.connection.hostname),
                channel_max: if other.connection.channel_max != defaults.channel_max {
                    other.connection.channel_max
                } else {
                    self.connection.channel_max
                },
                handle_max: if other.connection.handle_max != defaults.handle_max {
                    other.connection.handle_max
                } else {
                    self.connection.handle_max
                },
            },
        }
    }
}

/// Read a numeric environment variable, if set
fn env_number<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AmqpError::Config(format!("Invalid {name}={value}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Container id sent in OPEN (generated when absent)
    pub container_id: Option<String>,

    /// Virtual host name sent in OPEN
    pub hostname: Option<String>,

    /// Highest channel number a session may use
    pub channel_max: u16,

    /// Highest handle number a link may use within a session
    pub handle_max: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            container_id: None,
            hostname: None,
            channel_max: DEFAULT_CHANNEL_MAX,
            handle_max: DEFAULT_HANDLE_MAX,
        }
    }
}

impl ConnectionConfig {
    /// Set the container id
    pub fn with_container_id(mut self, id: impl Into<String>) -> Self {
        self.container_id = Some(id.into());
        self
    }

    /// Set the channel limit
    pub fn with_channel_max(mut self, channel_max: u16) -> Self {
        self.channel_max = channel_max;
        self
    }

    /// Set the per-session handle limit
    pub fn with_handle_max(mut self, handle_max: u32) -> Self {
        self.handle_max = handle_max;
        self
    }
}
