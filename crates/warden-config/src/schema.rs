//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use warden_common::{Result, WardenError};

/// Main configuration structure for Warden Bot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Twitch connection configuration.
    #[serde(default)]
    pub twitch: TwitchConfig,
    /// Bot behavior configuration.
    #[serde(default)]
    pub bot: BotConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Twitch IRC and API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitchConfig {
    /// IRC host.
    pub host: String,
    /// IRC port.
    pub port: u16,
    /// Bot account nickname.
    pub nickname: String,
    /// OAuth token for the IRC connection.
    pub token: String,
    /// Helix API credentials; follower and stream lookups are disabled
    /// when absent.
    #[serde(default)]
    pub api: Option<ApiConfig>,
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            host: "irc.chat.twitch.tv".to_string(),
            port: 6667,
            nickname: String::new(),
            token: String::new(),
            api: None,
        }
    }
}

/// Twitch Helix API credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Application client id.
    pub client_id: String,
    /// OAuth bearer token.
    pub bearer_token: String,
}

/// Bot behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Command prefix, e.g. `+`.
    pub prefix: String,
    /// Logins granted the owner permission level.
    pub owners: Vec<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: "+".to_string(),
            owners: Vec::new(),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON data file holding custom commands and the
    /// channel roster.
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("warden-data.json"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter, e.g. `info` or `warden_bot=debug`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Validates the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.twitch.nickname.trim().is_empty() {
            return Err(WardenError::config("twitch.nickname must be set"));
        }
        if self.twitch.token.trim().is_empty() {
            return Err(WardenError::config("twitch.token must be set"));
        }
        if self.twitch.host.trim().is_empty() {
            return Err(WardenError::config("twitch.host must be set"));
        }
        if self.bot.prefix.is_empty() || self.bot.prefix.chars().any(char::is_whitespace) {
            return Err(WardenError::config(
                "bot.prefix must be non-empty and contain no whitespace",
            ));
        }
        if let Some(api) = &self.twitch.api {
            if api.client_id.trim().is_empty() || api.bearer_token.trim().is_empty() {
                return Err(WardenError::config(
                    "twitch.api requires both client_id and bearer_token",
                ));
            }
        }
        Ok(())
    }
}
