//! Shared data model: channel status, log entries, and runtime commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a channel's gating status. Derived and ephemeral — never
/// persisted beyond the cache TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelStatus {
    pub is_live: bool,
    pub is_following: bool,
    pub is_banned: bool,
    pub last_checked: DateTime<Utc>,
}

/// Log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// One entry in the application log stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub source: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, source: Option<&str>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            source: source.map(String::from),
        }
    }

    /// Display form used by the log tail: `<ts> [LEVEL] message (source)`.
    pub fn format(&self) -> String {
        let mut s = format!(
            "{} [{}] {}",
            self.timestamp.to_rfc3339(),
            self.level,
            self.message
        );
        if let Some(src) = &self.source {
            s.push_str(&format!(" ({src})"));
        }
        s
    }
}

/// Settings payload accepted from the control surface.
///
/// Interval fields are clamped (not rejected) when applied: fixed interval
/// to 1..=60 minutes, random bounds to 1..=300 minutes with min <= max.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub channel: String,
    pub message: String,
    pub interval_minutes: u32,
    #[serde(default)]
    pub ignore_live_status: bool,
    #[serde(default)]
    pub random_interval: bool,
    #[serde(default = "default_random_min")]
    pub random_min_minutes: u32,
    #[serde(default = "default_random_max")]
    pub random_max_minutes: u32,
}

fn default_random_min() -> u32 {
    20
}
fn default_random_max() -> u32 {
    60
}

impl SettingsUpdate {
    /// Normalize in place: lowercase/trim the channel, trim the message,
    /// clamp the interval fields.
    pub fn normalize(&mut self) {
        self.channel = self.channel.trim().to_lowercase();
        self.message = self.message.trim().to_string();
        self.interval_minutes = self.interval_minutes.clamp(1, 60);
        self.random_min_minutes = self.random_min_minutes.clamp(1, 300);
        self.random_max_minutes = self.random_max_minutes.clamp(1, 300);
        if self.random_max_minutes < self.random_min_minutes {
            self.random_max_minutes = self.random_min_minutes;
        }
    }
}

/// Runtime command handed from the control surface to the scheduler.
/// Immutable once enqueued; consumed exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Activate/deactivate the periodic send. The flag itself is already
    /// authoritative in the application state when this is consumed.
    ToggleActive(bool),
    /// Apply new settings; `old_channel` lets the scheduler part the
    /// previous channel before the next send tick.
    ApplySettings {
        update: SettingsUpdate,
        old_channel: String,
    },
}

/// A channel emote, as reported by the status provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emote {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entry_format() {
        let entry = LogEntry::new(LogLevel::Info, "Message sent", Some("Scheduler"));
        let s = entry.format();
        assert!(s.contains("[INFO] Message sent (Scheduler)"));

        let plain = LogEntry::new(LogLevel::Error, "boom", None);
        assert!(plain.format().ends_with("[ERROR] boom"));
    }

    #[test]
    fn test_settings_normalize_clamps() {
        let mut update = SettingsUpdate {
            channel: "  SomeChannel ".into(),
            message: " hi ".into(),
            interval_minutes: 90,
            ignore_live_status: false,
            random_interval: true,
            random_min_minutes: 0,
            random_max_minutes: 500,
        };
        update.normalize();
        assert_eq!(update.channel, "somechannel");
        assert_eq!(update.message, "hi");
        assert_eq!(update.interval_minutes, 60);
        assert_eq!(update.random_min_minutes, 1);
        assert_eq!(update.random_max_minutes, 300);
    }

    #[test]
    fn test_settings_normalize_orders_random_bounds() {
        let mut update = SettingsUpdate {
            channel: "c".into(),
            message: "m".into(),
            interval_minutes: 5,
            ignore_live_status: false,
            random_interval: true,
            random_min_minutes: 40,
            random_max_minutes: 10,
        };
        update.normalize();
        assert_eq!(update.random_max_minutes, 40);
    }
}
