//! # Castpulse Core
//!
//! Shared foundation for the Castpulse workspace: the error taxonomy,
//! configuration loading, the data model (channel status, log entries,
//! runtime commands), and the capability traits the scheduler depends on
//! (`ChatSession`, `StatusProvider`).
//!
//! Nothing in this crate talks to the network — concrete adapters live in
//! `castpulse-chat` and `castpulse-api`.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{BotConfig, CacheConfig, CastpulseConfig, TwitchConfig};
pub use error::{ApiError, ApiResult, CastpulseError, Result};
pub use traits::{ChannelHandle, ChatSession, StatusProvider};
pub use types::{ChannelStatus, Command, Emote, LogEntry, LogLevel, SettingsUpdate};
