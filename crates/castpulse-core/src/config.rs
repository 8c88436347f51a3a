//! Castpulse configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::SettingsUpdate;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CastpulseConfig {
    #[serde(default)]
    pub twitch: TwitchConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl CastpulseConfig {
    /// Load config from the default path (~/.castpulse/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::CastpulseError::Config(format!("Failed to read config: {e}"))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            crate::error::CastpulseError::Config(format!("Failed to parse config: {e}"))
        })?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| {
            crate::error::CastpulseError::Config(format!("Failed to serialize config: {e}"))
        })?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the Castpulse home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".castpulse")
    }
}

/// Twitch credentials and identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitchConfig {
    /// OAuth token, `oauth:`-prefixed.
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub client_id: String,
    /// Bot login name used for IRC auth and the follow check.
    #[serde(default = "default_login")]
    pub login: String,
}

fn default_login() -> String {
    "castpulse".into()
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            client_id: String::new(),
            login: default_login(),
        }
    }
}

impl TwitchConfig {
    /// Bearer token for the Helix API (the `oauth:` prefix stripped).
    pub fn bearer_token(&self) -> &str {
        self.token.strip_prefix("oauth:").unwrap_or(&self.token)
    }
}

/// The live bot configuration snapshot. Replaced atomically as a whole —
/// a reader never observes a mix of old and new fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub channel: String,
    #[serde(default = "default_message")]
    pub message: String,
    #[serde(default = "default_interval")]
    pub interval_minutes: u32,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub ignore_live_status: bool,
    #[serde(default)]
    pub random_interval: bool,
    #[serde(default = "default_random_min")]
    pub random_min_minutes: u32,
    #[serde(default = "default_random_max")]
    pub random_max_minutes: u32,
}

fn default_message() -> String {
    "Hello world!".into()
}
fn default_interval() -> u32 {
    5
}
fn default_random_min() -> u32 {
    20
}
fn default_random_max() -> u32 {
    60
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            channel: String::new(),
            message: default_message(),
            interval_minutes: default_interval(),
            active: false,
            ignore_live_status: false,
            random_interval: false,
            random_min_minutes: default_random_min(),
            random_max_minutes: default_random_max(),
        }
    }
}

impl BotConfig {
    /// Build the next snapshot from a normalized settings update.
    /// `active` is untouched — it only changes via toggle.
    pub fn with_update(&self, update: &SettingsUpdate) -> Self {
        Self {
            channel: update.channel.clone(),
            message: update.message.clone(),
            interval_minutes: update.interval_minutes,
            active: self.active,
            ignore_live_status: update.ignore_live_status,
            random_interval: update.random_interval,
            random_min_minutes: update.random_min_minutes,
            random_max_minutes: update.random_max_minutes,
        }
    }
}

/// Cache TTLs and sweep cadence, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_ban_ttl")]
    pub ban_ttl_secs: u64,
    #[serde(default = "default_sweep")]
    pub sweep_secs: u64,
}

fn default_ttl() -> u64 {
    300
}
fn default_ban_ttl() -> u64 {
    60
}
fn default_sweep() -> u64 {
    300
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            ban_ttl_secs: default_ban_ttl(),
            sweep_secs: default_sweep(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = CastpulseConfig::default();
        assert_eq!(cfg.bot.message, "Hello world!");
        assert_eq!(cfg.bot.interval_minutes, 5);
        assert!(!cfg.bot.active);
        assert_eq!(cfg.cache.ttl_secs, 300);
        assert_eq!(cfg.cache.ban_ttl_secs, 60);
    }

    #[test]
    fn test_bearer_token_strips_prefix() {
        let tw = TwitchConfig {
            token: "oauth:abc123".into(),
            ..Default::default()
        };
        assert_eq!(tw.bearer_token(), "abc123");

        let bare = TwitchConfig {
            token: "abc123".into(),
            ..Default::default()
        };
        assert_eq!(bare.bearer_token(), "abc123");
    }

    #[test]
    fn test_with_update_preserves_active() {
        let mut base = BotConfig::default();
        base.active = true;
        let update = SettingsUpdate {
            channel: "beta".into(),
            message: "hey".into(),
            interval_minutes: 10,
            ignore_live_status: true,
            random_interval: false,
            random_min_minutes: 20,
            random_max_minutes: 60,
        };
        let next = base.with_update(&update);
        assert!(next.active);
        assert_eq!(next.channel, "beta");
        assert_eq!(next.interval_minutes, 10);
    }

    #[test]
    fn test_parse_partial_toml() {
        let cfg: CastpulseConfig = toml::from_str(
            r#"
            [bot]
            channel = "somechannel"
            interval_minutes = 7
            "#,
        )
        .unwrap();
        assert_eq!(cfg.bot.channel, "somechannel");
        assert_eq!(cfg.bot.interval_minutes, 7);
        assert_eq!(cfg.bot.message, "Hello world!");
    }
}
