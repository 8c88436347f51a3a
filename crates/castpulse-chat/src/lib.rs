//! # Castpulse Chat
//!
//! Twitch IRC-over-WebSocket implementation of the `ChatSession`
//! capability. The scheduler only sees the trait; this crate owns the
//! socket, the PING/PONG keepalive, and NOTICE-based rejection tracking
//! that feeds the writability probe.

pub mod irc;
pub mod session;

pub use session::IrcSession;
