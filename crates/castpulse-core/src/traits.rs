//! Capability traits the scheduler depends on.
//!
//! Concrete adapters (`castpulse-chat` for IRC, `castpulse-api` for Helix)
//! implement these; tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::error::{ApiResult, Result};
use crate::types::Emote;

/// Handle to a joined chat channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHandle {
    pub name: String,
}

impl ChannelHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A live chat connection capable of joining channels and posting messages.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Bot login name on this session.
    fn nick(&self) -> &str;

    async fn join_channel(&self, name: &str) -> Result<()>;

    async fn part_channel(&self, name: &str) -> Result<()>;

    /// Handle for a channel this session has joined, if any.
    async fn channel(&self, name: &str) -> Option<ChannelHandle>;

    async fn send(&self, handle: &ChannelHandle, text: &str) -> Result<()>;

    /// Best-effort writability probe. Side-effecting (it may post into the
    /// channel) and never authoritative; an error means the channel likely
    /// rejects messages from this session.
    async fn probe(&self, handle: &ChannelHandle) -> Result<()>;
}

/// Remote status/action provider. Any call may fail retryable (timeout,
/// connection) or non-retryable (auth, rate limit, unexpected status).
#[async_trait]
pub trait StatusProvider: Send + Sync {
    /// Resolve a login name to a user id, `None` if unknown.
    async fn resolve_user_id(&self, login: &str) -> ApiResult<Option<String>>;

    /// Whether the user has a live stream right now.
    async fn fetch_live_streams(&self, user_id: &str) -> ApiResult<bool>;

    /// Whether a follow edge exists from `follower_id` to `channel_id`.
    async fn fetch_follow_edge(&self, follower_id: &str, channel_id: &str) -> ApiResult<bool>;

    /// Create a follow edge. Returns whether the provider accepted it.
    async fn post_follow_edge(&self, follower_id: &str, channel_id: &str) -> ApiResult<bool>;

    /// Channel emote list.
    async fn fetch_emotes(&self, user_id: &str) -> ApiResult<Vec<Emote>>;

    /// Display name of the authenticated user, if resolvable.
    async fn fetch_self_user(&self) -> ApiResult<Option<String>>;
}
