//! Local ban heuristic.
//!
//! There is no cheap authoritative "am I banned" query on the status
//! provider, so this introspects the chat session instead: make sure we
//! are in the channel (a failed join reads as banned) and attempt a probe
//! send (a rejected probe reads as banned). The verdict goes into the
//! short-TTL ban cache that also gates activation in the application
//! state. Side-effecting and best-effort — never authoritative.

use std::sync::Arc;

use castpulse_cache::TtlCache;
use castpulse_core::traits::ChatSession;
use castpulse_state::ban_cache_key;

/// Cached ban check for `channel`. On a cache miss the session is probed
/// and the result cached under the short ban TTL.
pub async fn check_banned(
    session: &Arc<dyn ChatSession>,
    ban_cache: &TtlCache<String, bool>,
    channel: &str,
) -> bool {
    let key = ban_cache_key(channel);
    if let Some(banned) = ban_cache.get(&key) {
        return banned;
    }
    let banned = probe_channel(session, channel).await;
    ban_cache.set(key, banned);
    banned
}

async fn probe_channel(session: &Arc<dyn ChatSession>, channel: &str) -> bool {
    let handle = match session.channel(channel).await {
        Some(handle) => handle,
        None => {
            if let Err(e) = session.join_channel(channel).await {
                tracing::warn!("Ban probe could not join {channel}: {e}");
                return true;
            }
            match session.channel(channel).await {
                Some(handle) => handle,
                None => return true,
            }
        }
    };

    match session.probe(&handle).await {
        Ok(()) => false,
        Err(e) => {
            tracing::warn!("Ban probe rejected in {channel}: {e}");
            true
        }
    }
}
