//! Cache-keyed status checks derived from the remote provider.
//!
//! Failure defaults are deliberately asymmetric:
//! - live check is fail-closed: unknown ⇒ `false` (don't post to a channel
//!   we can't confirm is live);
//! - follow check is fail-open: unknown or unauthorized ⇒ `true`, and that
//!   default IS cached (don't spam follow attempts when the token lacks the
//!   scope to verify).
//! Do not unify these without revisiting the gating semantics.

use std::sync::Arc;

use castpulse_cache::{CacheStats, TtlCache};
use castpulse_core::error::{ApiError, ApiResult};
use castpulse_core::traits::StatusProvider;
use castpulse_core::types::Emote;

use crate::retry::{DEFAULT_MAX_RETRIES, retry_call};

/// Value stored in the general-purpose status cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Text(String),
    Flag(bool),
}

/// Remote status checks with caching and bounded retry.
pub struct StatusChecker {
    provider: Arc<dyn StatusProvider>,
    cache: Arc<TtlCache<String, CachedValue>>,
}

impl StatusChecker {
    pub fn new(provider: Arc<dyn StatusProvider>, cache: Arc<TtlCache<String, CachedValue>>) -> Self {
        Self { provider, cache }
    }

    /// The general-purpose cache backing these checks (for sweep and stats).
    pub fn cache(&self) -> &Arc<TtlCache<String, CachedValue>> {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Resolve a login name to a user id. Only a resolved id is cached —
    /// an absent result is retried on the next access.
    pub async fn resolve_user_id(&self, login: &str) -> ApiResult<Option<String>> {
        let login = login.to_lowercase();
        let key = format!("user_id:{login}");
        if let Some(CachedValue::Text(id)) = self.cache.get(&key) {
            return Ok(Some(id));
        }

        let provider = self.provider.clone();
        let user_id = retry_call("resolve user id", DEFAULT_MAX_RETRIES, || {
            provider.resolve_user_id(&login)
        })
        .await?;

        if let Some(id) = &user_id {
            self.cache.set(key, CachedValue::Text(id.clone()));
        }
        Ok(user_id)
    }

    /// Whether the channel is live. Fail-closed: an unresolvable login is
    /// cached as not-live; transient failure reports not-live uncached.
    pub async fn is_live(&self, login: &str) -> bool {
        let login = login.to_lowercase();
        let key = format!("live_status:{login}");
        if let Some(CachedValue::Flag(live)) = self.cache.get(&key) {
            return live;
        }

        let user_id = match self.resolve_user_id(&login).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                self.cache.set(key, CachedValue::Flag(false));
                return false;
            }
            Err(e) => {
                tracing::error!("Error resolving {login} for live check: {e}");
                return false;
            }
        };

        let provider = self.provider.clone();
        match retry_call("live status", DEFAULT_MAX_RETRIES, || {
            provider.fetch_live_streams(&user_id)
        })
        .await
        {
            Ok(live) => {
                self.cache.set(key, CachedValue::Flag(live));
                live
            }
            Err(e) => {
                tracing::error!("Error checking live status for {login}: {e}");
                false
            }
        }
    }

    /// Whether `follower` follows `channel`. Fail-open: an unresolvable id
    /// or an authorization failure defaults to `true` and the default is
    /// cached.
    pub async fn is_following(&self, follower: &str, channel: &str) -> bool {
        let follower = follower.to_lowercase();
        let channel = channel.to_lowercase();
        let key = format!("follow_status:{follower}:{channel}");
        if let Some(CachedValue::Flag(following)) = self.cache.get(&key) {
            return following;
        }

        let ids = match (
            self.resolve_user_id(&follower).await,
            self.resolve_user_id(&channel).await,
        ) {
            (Ok(Some(f)), Ok(Some(c))) => Some((f, c)),
            (Ok(_), Ok(_)) => None,
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!("Error resolving ids for follow check: {e}");
                return true;
            }
        };
        let Some((follower_id, channel_id)) = ids else {
            self.cache.set(key, CachedValue::Flag(true));
            return true;
        };

        let provider = self.provider.clone();
        match retry_call("follow status", DEFAULT_MAX_RETRIES, || {
            provider.fetch_follow_edge(&follower_id, &channel_id)
        })
        .await
        {
            Ok(following) => {
                self.cache.set(key, CachedValue::Flag(following));
                following
            }
            Err(e) if e.is_auth() => {
                tracing::warn!(
                    "Authentication error checking follow status (token may lack follow scope): {e}"
                );
                self.cache.set(key, CachedValue::Flag(true));
                true
            }
            Err(e) => {
                tracing::error!("Error checking follow status: {e}");
                true
            }
        }
    }

    /// Best-effort follow-edge creation. Invalidates the cached follow
    /// status on success so the next check observes the new edge.
    pub async fn follow(&self, follower: &str, channel: &str) -> ApiResult<bool> {
        let follower = follower.to_lowercase();
        let channel = channel.to_lowercase();

        let follower_id = self
            .resolve_user_id(&follower)
            .await?
            .ok_or_else(|| ApiError::Decode(format!("unknown user {follower}")))?;
        let channel_id = self
            .resolve_user_id(&channel)
            .await?
            .ok_or_else(|| ApiError::Decode(format!("unknown channel {channel}")))?;

        let provider = self.provider.clone();
        let accepted = retry_call("create follow", DEFAULT_MAX_RETRIES, || {
            provider.post_follow_edge(&follower_id, &channel_id)
        })
        .await?;

        if accepted {
            self.cache
                .invalidate(&format!("follow_status:{follower}:{channel}"));
        }
        Ok(accepted)
    }

    /// Display name of the authenticated account, cached. `None` when the
    /// provider can't tell us (callers fall back to the configured login).
    pub async fn self_display_name(&self) -> Option<String> {
        let key = "self_user".to_string();
        if let Some(CachedValue::Text(name)) = self.cache.get(&key) {
            return Some(name);
        }

        let provider = self.provider.clone();
        match retry_call("self user", DEFAULT_MAX_RETRIES, || provider.fetch_self_user()).await {
            Ok(Some(name)) => {
                self.cache.set(key, CachedValue::Text(name.clone()));
                Some(name)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::error!("Error fetching bot user: {e}");
                None
            }
        }
    }

    /// Channel emote list. Unknown channel yields an empty list.
    pub async fn channel_emotes(&self, login: &str) -> ApiResult<Vec<Emote>> {
        let Some(user_id) = self.resolve_user_id(login).await? else {
            return Ok(Vec::new());
        };
        let provider = self.provider.clone();
        retry_call("channel emotes", DEFAULT_MAX_RETRIES, || {
            provider.fetch_emotes(&user_id)
        })
        .await
    }
}
