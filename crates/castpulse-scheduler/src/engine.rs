//! The periodic-send engine.
//!
//! Holds a private mirror of the bot configuration that only the update
//! loop mutates; every send tick clones that mirror whole, so a tick
//! never observes a half-applied settings change.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use castpulse_api::StatusChecker;
use castpulse_cache::{CacheStats, TtlCache};
use castpulse_core::config::BotConfig;
use castpulse_core::traits::{ChannelHandle, ChatSession};
use castpulse_core::types::{ChannelStatus, Command, LogLevel};
use castpulse_state::AppState;

use crate::ban;
use crate::gate::{GateDecision, SkipReason, gate};
use crate::poll::spawn_poll_loop;

const SOURCE: &str = "Scheduler";

/// How long the update loop blocks waiting for a command per iteration.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Backoff after an unexpected send-loop error.
const ERROR_BACKOFF: Duration = Duration::from_secs(60);

/// Outcome of one send tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Sent,
    Skipped,
}

/// Per-cache statistics for the observability surface.
#[derive(Debug, Clone)]
pub struct SchedulerCacheStats {
    pub api: CacheStats,
    pub ban: CacheStats,
}

/// The periodic announcement scheduler.
pub struct AnnounceScheduler {
    state: Arc<AppState>,
    session: Arc<dyn ChatSession>,
    checker: Arc<StatusChecker>,
    ban_cache: Arc<TtlCache<String, bool>>,
    /// Private mirror of the live configuration; written only by the
    /// update loop, read whole by the send loop.
    mirror: tokio::sync::Mutex<BotConfig>,
    /// Session handle for the currently targeted channel.
    current: tokio::sync::Mutex<Option<ChannelHandle>>,
    stop_tx: watch::Sender<bool>,
    tasks: tokio::sync::Mutex<Vec<JoinHandle<()>>>,
    sweep_interval: Duration,
}

impl AnnounceScheduler {
    pub fn new(
        state: Arc<AppState>,
        session: Arc<dyn ChatSession>,
        checker: Arc<StatusChecker>,
        sweep_interval: Duration,
    ) -> Arc<Self> {
        let (stop_tx, _) = watch::channel(false);
        let mirror = (*state.config()).clone();
        let ban_cache = state.ban_cache().clone();
        Arc::new(Self {
            state,
            session,
            checker,
            ban_cache,
            mirror: tokio::sync::Mutex::new(mirror),
            current: tokio::sync::Mutex::new(None),
            stop_tx,
            tasks: tokio::sync::Mutex::new(Vec::new()),
            sweep_interval,
        })
    }

    /// Join the configured channel (best effort) and spawn the send,
    /// update, and cache-cleanup loops.
    pub async fn start(self: &Arc<Self>) {
        let channel = self.mirror.lock().await.channel.clone();
        if !channel.is_empty() && self.ensure_channel(&channel).await.is_none() {
            self.state.append_log(
                LogLevel::Warning,
                format!("Could not join initial channel: {channel}"),
                Some(SOURCE),
            );
        }

        let mut tasks = self.tasks.lock().await;

        let me = self.clone();
        let stop = self.stop_tx.subscribe();
        tasks.push(tokio::spawn(async move { me.send_loop(stop).await }));

        let me = self.clone();
        tasks.push(spawn_poll_loop(
            "update",
            self.stop_tx.subscribe(),
            move || {
                let me = me.clone();
                async move {
                    if let Some(command) = me.state.drain_command(DRAIN_TIMEOUT).await {
                        me.apply_command(command).await;
                    }
                    Ok(())
                }
            },
        ));

        let me = self.clone();
        tasks.push(spawn_poll_loop(
            "cache cleanup",
            self.stop_tx.subscribe(),
            move || {
                let me = me.clone();
                async move {
                    tokio::time::sleep(me.sweep_interval).await;
                    // Per-instance sweeps; the locks are never held together.
                    me.checker.cache().cleanup_expired();
                    me.ban_cache.cleanup_expired();
                    Ok(())
                }
            },
        ));

        self.state
            .append_log(LogLevel::Info, "Background tasks started", Some(SOURCE));
    }

    /// Cooperative shutdown: flip the stop flag, await every loop, then
    /// release the session. No send is in flight once this returns.
    pub async fn shutdown(&self) {
        self.state
            .append_log(LogLevel::Info, "Shutting down scheduler...", Some(SOURCE));
        let _ = self.stop_tx.send(true);

        let mut tasks = self.tasks.lock().await;
        for task in tasks.drain(..) {
            if let Err(e) = task.await {
                tracing::warn!("Scheduler task join failed: {e}");
            }
        }

        if let Some(handle) = self.current.lock().await.take()
            && let Err(e) = self.session.part_channel(&handle.name).await
        {
            tracing::warn!("Failed to part {} on shutdown: {e}", handle.name);
        }

        self.state
            .append_log(LogLevel::Info, "Scheduler stopped", Some(SOURCE));
    }

    pub fn cache_stats(&self) -> SchedulerCacheStats {
        SchedulerCacheStats {
            api: self.checker.cache_stats(),
            ban: self.ban_cache.stats(),
        }
    }

    async fn send_loop(self: Arc<Self>, mut stop: watch::Receiver<bool>) {
        loop {
            if *stop.borrow() {
                break;
            }
            let wait = self.next_wait().await;
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = stop.changed() => {
                    if *stop.borrow() {
                        break;
                    }
                    continue;
                }
            }

            let config = self.mirror.lock().await.clone();
            if !config.active {
                continue;
            }

            if let Err(e) = self.run_tick(&config).await {
                self.state.append_log(
                    LogLevel::Error,
                    format!("Error in send loop: {e}"),
                    Some(SOURCE),
                );
                // Unexpected failure: back off before the next wait.
                tokio::select! {
                    _ = tokio::time::sleep(ERROR_BACKOFF) => {}
                    _ = stop.changed() => {
                        if *stop.borrow() {
                            break;
                        }
                    }
                }
            }
        }
        tracing::debug!("send loop stopped");
    }

    /// Wait before the next tick: a uniform sample from the random range,
    /// or the fixed interval.
    async fn next_wait(&self) -> Duration {
        let config = self.mirror.lock().await.clone();
        if config.random_interval {
            let minutes = {
                use rand::Rng;
                let lo = config.random_min_minutes as f64;
                let hi = (config.random_max_minutes as f64).max(lo);
                rand::thread_rng().gen_range(lo..=hi)
            };
            self.state.append_log(
                LogLevel::Info,
                format!("Random interval: waiting {minutes:.1} minutes"),
                Some(SOURCE),
            );
            Duration::from_secs_f64(minutes * 60.0)
        } else {
            Duration::from_secs(u64::from(config.interval_minutes) * 60)
        }
    }

    /// One tick of the send state machine:
    /// `ENSURE_CHANNEL → CHECK_STATUS → {SKIP|SEND}`.
    /// Every expected failure is handled here and yields `Skipped`; an
    /// `Err` means something the loop should back off from.
    pub(crate) async fn run_tick(
        &self,
        config: &BotConfig,
    ) -> castpulse_core::Result<TickOutcome> {
        // ENSURE_CHANNEL
        let Some(handle) = self.ensure_channel(&config.channel).await else {
            return Ok(TickOutcome::Skipped);
        };

        // CHECK_STATUS — ban first (local), then live/follow concurrently.
        let is_banned =
            ban::check_banned(&self.session, &self.ban_cache, &config.channel).await;
        let (is_live, is_following) = tokio::join!(
            self.checker.is_live(&config.channel),
            self.checker
                .is_following(self.session.nick(), &config.channel)
        );
        let status = ChannelStatus {
            is_live,
            is_following,
            is_banned,
            last_checked: Utc::now(),
        };

        match gate(&status, config.ignore_live_status) {
            GateDecision::Skip(SkipReason::Banned) => {
                self.state.append_log(
                    LogLevel::Error,
                    format!("Banned from channel {}, skipping message", config.channel),
                    Some(SOURCE),
                );
                Ok(TickOutcome::Skipped)
            }
            GateDecision::Skip(SkipReason::NotLive) => {
                self.state.append_log(
                    LogLevel::Info,
                    format!("Channel {} is not live, skipping message", config.channel),
                    Some(SOURCE),
                );
                Ok(TickOutcome::Skipped)
            }
            GateDecision::SendAfterFollow => {
                match self
                    .checker
                    .follow(self.session.nick(), &config.channel)
                    .await
                {
                    Ok(true) => self.state.append_log(
                        LogLevel::Info,
                        format!("Now following {}", config.channel),
                        Some(SOURCE),
                    ),
                    Ok(false) | Err(_) => self.state.append_log(
                        LogLevel::Warning,
                        format!("Not following {}, follow attempt failed; continuing", config.channel),
                        Some(SOURCE),
                    ),
                }
                self.send_message(&handle, config).await
            }
            GateDecision::Send => self.send_message(&handle, config).await,
        }
    }

    async fn send_message(
        &self,
        handle: &ChannelHandle,
        config: &BotConfig,
    ) -> castpulse_core::Result<TickOutcome> {
        match self.session.send(handle, &config.message).await {
            Ok(()) => {
                self.state.append_log(
                    LogLevel::Info,
                    format!(
                        "Message sent successfully on {}: {}",
                        config.channel, config.message
                    ),
                    Some(SOURCE),
                );
                Ok(TickOutcome::Sent)
            }
            Err(e) => {
                self.state.append_log(
                    LogLevel::Error,
                    format!("Error sending message on {}: {e}", config.channel),
                    Some(SOURCE),
                );
                Ok(TickOutcome::Skipped)
            }
        }
    }

    /// Make sure we hold a session handle for `channel`, joining if the
    /// session doesn't have one. `None` means this tick should be skipped.
    async fn ensure_channel(&self, channel: &str) -> Option<ChannelHandle> {
        let mut current = self.current.lock().await;
        if let Some(handle) = current.as_ref()
            && handle.name == channel
        {
            return Some(handle.clone());
        }

        let handle = match self.session.channel(channel).await {
            Some(handle) => handle,
            None => {
                if let Err(e) = self.session.join_channel(channel).await {
                    self.state.append_log(
                        LogLevel::Error,
                        format!("Error joining channel {channel}: {e}"),
                        Some(SOURCE),
                    );
                    return None;
                }
                match self.session.channel(channel).await {
                    Some(handle) => handle,
                    None => {
                        self.state.append_log(
                            LogLevel::Error,
                            format!("Failed to join channel {channel}"),
                            Some(SOURCE),
                        );
                        return None;
                    }
                }
            }
        };

        *current = Some(handle.clone());
        Some(handle)
    }

    /// Apply one drained command to the private mirror. Called only from
    /// the update loop; a failure here is terminal for the command.
    pub(crate) async fn apply_command(&self, command: Command) {
        match command {
            Command::ToggleActive(active) => {
                // The flag is already authoritative in AppState; mirror it
                // and log.
                self.mirror.lock().await.active = active;
                let status = if active { "activated" } else { "deactivated" };
                self.state
                    .append_log(LogLevel::Info, format!("Bot {status}"), Some(SOURCE));
            }
            Command::ApplySettings {
                update,
                old_channel,
            } => {
                {
                    let mut mirror = self.mirror.lock().await;
                    *mirror = mirror.with_update(&update);
                }
                // Channel switch must complete before we report the update
                // applied, so the next tick can't pair the new message
                // with the old channel.
                if old_channel != update.channel {
                    self.switch_channel(&old_channel, &update.channel).await;
                }
                self.state.append_log(
                    LogLevel::Info,
                    format!(
                        "Settings applied - Channel: {}, Interval: {}min, Ignore Live: {}",
                        update.channel, update.interval_minutes, update.ignore_live_status
                    ),
                    Some(SOURCE),
                );
            }
        }
    }

    async fn switch_channel(&self, old: &str, new: &str) {
        if !old.is_empty()
            && let Err(e) = self.session.part_channel(old).await
        {
            self.state.append_log(
                LogLevel::Error,
                format!("Error parting channel {old}: {e}"),
                Some(SOURCE),
            );
        }

        match self.session.join_channel(new).await {
            Ok(()) => {
                *self.current.lock().await = self.session.channel(new).await;
                self.state.append_log(
                    LogLevel::Info,
                    format!("Switched from {old} to {new}"),
                    Some(SOURCE),
                );
            }
            Err(e) => {
                // Next tick's ENSURE_CHANNEL retries the join.
                *self.current.lock().await = None;
                self.state.append_log(
                    LogLevel::Error,
                    format!("Error switching channels: {e}"),
                    Some(SOURCE),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use castpulse_api::CachedValue;
    use castpulse_core::error::{ApiResult, CastpulseError};
    use castpulse_core::traits::StatusProvider;
    use castpulse_core::types::{Emote, SettingsUpdate};
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory chat session recording every operation.
    struct FakeSession {
        joined: Mutex<HashSet<String>>,
        events: Mutex<Vec<String>>,
        fail_joins: Mutex<HashSet<String>>,
    }

    impl FakeSession {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                joined: Mutex::new(HashSet::new()),
                events: Mutex::new(Vec::new()),
                fail_joins: Mutex::new(HashSet::new()),
            })
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn record(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[async_trait]
    impl ChatSession for FakeSession {
        fn nick(&self) -> &str {
            "castbot"
        }

        async fn join_channel(&self, name: &str) -> castpulse_core::Result<()> {
            if self.fail_joins.lock().unwrap().contains(name) {
                self.record(format!("join_failed:{name}"));
                return Err(CastpulseError::Chat("join refused".into()));
            }
            self.record(format!("join:{name}"));
            self.joined.lock().unwrap().insert(name.to_string());
            Ok(())
        }

        async fn part_channel(&self, name: &str) -> castpulse_core::Result<()> {
            self.record(format!("part:{name}"));
            self.joined.lock().unwrap().remove(name);
            Ok(())
        }

        async fn channel(&self, name: &str) -> Option<ChannelHandle> {
            self.joined
                .lock()
                .unwrap()
                .contains(name)
                .then(|| ChannelHandle::new(name))
        }

        async fn send(&self, handle: &ChannelHandle, text: &str) -> castpulse_core::Result<()> {
            self.record(format!("send:{}:{text}", handle.name));
            Ok(())
        }

        async fn probe(&self, handle: &ChannelHandle) -> castpulse_core::Result<()> {
            self.record(format!("probe:{}", handle.name));
            Ok(())
        }
    }

    /// Provider where every login resolves and liveness is configurable.
    struct FakeProvider {
        live: bool,
        following: bool,
    }

    #[async_trait]
    impl StatusProvider for FakeProvider {
        async fn resolve_user_id(&self, login: &str) -> ApiResult<Option<String>> {
            Ok(Some(format!("id-{login}")))
        }
        async fn fetch_live_streams(&self, _user_id: &str) -> ApiResult<bool> {
            Ok(self.live)
        }
        async fn fetch_follow_edge(&self, _f: &str, _c: &str) -> ApiResult<bool> {
            Ok(self.following)
        }
        async fn post_follow_edge(&self, _f: &str, _c: &str) -> ApiResult<bool> {
            Ok(true)
        }
        async fn fetch_emotes(&self, _user_id: &str) -> ApiResult<Vec<Emote>> {
            Ok(Vec::new())
        }
        async fn fetch_self_user(&self) -> ApiResult<Option<String>> {
            Ok(Some("CastBot".into()))
        }
    }

    fn scheduler(
        session: Arc<FakeSession>,
        provider: FakeProvider,
        config: BotConfig,
    ) -> (Arc<AnnounceScheduler>, Arc<AppState>) {
        let ban_cache = Arc::new(TtlCache::new(Duration::from_secs(60)));
        let state = AppState::new(config, ban_cache);
        let checker = Arc::new(StatusChecker::new(
            Arc::new(provider),
            Arc::new(TtlCache::new(Duration::from_secs(300))),
        ));
        let scheduler = AnnounceScheduler::new(
            state.clone(),
            session,
            checker,
            Duration::from_secs(300),
        );
        (scheduler, state)
    }

    fn config(channel: &str) -> BotConfig {
        BotConfig {
            channel: channel.into(),
            message: "hello chat".into(),
            active: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_tick_sends_when_live_and_following() {
        let session = FakeSession::new();
        let (scheduler, _state) =
            scheduler(session.clone(), FakeProvider { live: true, following: true }, config("alpha"));

        let outcome = scheduler.run_tick(&config("alpha")).await.unwrap();
        assert_eq!(outcome, TickOutcome::Sent);
        assert!(session.events().contains(&"send:alpha:hello chat".to_string()));
    }

    #[tokio::test]
    async fn test_tick_skips_when_offline() {
        let session = FakeSession::new();
        let (scheduler, _state) =
            scheduler(session.clone(), FakeProvider { live: false, following: true }, config("alpha"));

        let outcome = scheduler.run_tick(&config("alpha")).await.unwrap();
        assert_eq!(outcome, TickOutcome::Skipped);
        assert!(!session.events().iter().any(|e| e.starts_with("send:")));
    }

    #[tokio::test]
    async fn test_tick_sends_when_offline_but_ignored() {
        let session = FakeSession::new();
        let mut cfg = config("alpha");
        cfg.ignore_live_status = true;
        let (scheduler, _state) =
            scheduler(session.clone(), FakeProvider { live: false, following: true }, cfg.clone());

        let outcome = scheduler.run_tick(&cfg).await.unwrap();
        assert_eq!(outcome, TickOutcome::Sent);
    }

    #[tokio::test]
    async fn test_tick_follows_then_sends_when_not_following() {
        let session = FakeSession::new();
        let (scheduler, _state) =
            scheduler(session.clone(), FakeProvider { live: true, following: false }, config("alpha"));

        let outcome = scheduler.run_tick(&config("alpha")).await.unwrap();
        assert_eq!(outcome, TickOutcome::Sent);
    }

    #[tokio::test]
    async fn test_tick_skips_when_ban_cached() {
        let session = FakeSession::new();
        let (scheduler, state) =
            scheduler(session.clone(), FakeProvider { live: true, following: true }, config("alpha"));
        state
            .ban_cache()
            .set(castpulse_state::ban_cache_key("alpha"), true);

        let outcome = scheduler.run_tick(&config("alpha")).await.unwrap();
        assert_eq!(outcome, TickOutcome::Skipped);
        assert!(!session.events().iter().any(|e| e.starts_with("send:")));
    }

    #[tokio::test]
    async fn test_tick_skips_when_join_fails() {
        let session = FakeSession::new();
        session.fail_joins.lock().unwrap().insert("alpha".into());
        let (scheduler, _state) =
            scheduler(session.clone(), FakeProvider { live: true, following: true }, config("alpha"));

        let outcome = scheduler.run_tick(&config("alpha")).await.unwrap();
        assert_eq!(outcome, TickOutcome::Skipped);
        assert!(session.events().contains(&"join_failed:alpha".to_string()));
    }

    #[tokio::test]
    async fn test_channel_switch_parts_old_joins_new() {
        let session = FakeSession::new();
        session.joined.lock().unwrap().insert("alpha".into());
        let (scheduler, _state) =
            scheduler(session.clone(), FakeProvider { live: true, following: true }, config("alpha"));

        scheduler
            .apply_command(Command::ApplySettings {
                update: SettingsUpdate {
                    channel: "beta".into(),
                    message: "hello chat".into(),
                    interval_minutes: 5,
                    ignore_live_status: false,
                    random_interval: false,
                    random_min_minutes: 20,
                    random_max_minutes: 60,
                },
                old_channel: "alpha".into(),
            })
            .await;

        let events = session.events();
        let part_idx = events.iter().position(|e| e == "part:alpha").unwrap();
        let join_idx = events.iter().position(|e| e == "join:beta").unwrap();
        assert!(part_idx < join_idx);

        // The next tick targets the new channel.
        let mirror = scheduler.mirror.lock().await.clone();
        assert_eq!(mirror.channel, "beta");
        let outcome = scheduler.run_tick(&mirror).await.unwrap();
        assert_eq!(outcome, TickOutcome::Sent);
        assert!(session.events().contains(&"send:beta:hello chat".to_string()));
    }

    #[tokio::test]
    async fn test_toggle_command_updates_mirror_only() {
        let session = FakeSession::new();
        let (scheduler, _state) =
            scheduler(session.clone(), FakeProvider { live: true, following: true }, config("alpha"));

        scheduler.apply_command(Command::ToggleActive(false)).await;
        assert!(!scheduler.mirror.lock().await.active);
        assert!(session.events().is_empty(), "toggle must not touch the session");
    }

    #[tokio::test]
    async fn test_send_failure_is_caught_not_propagated() {
        struct FailingSendSession(Arc<FakeSession>);

        #[async_trait]
        impl ChatSession for FailingSendSession {
            fn nick(&self) -> &str {
                self.0.nick()
            }
            async fn join_channel(&self, name: &str) -> castpulse_core::Result<()> {
                self.0.join_channel(name).await
            }
            async fn part_channel(&self, name: &str) -> castpulse_core::Result<()> {
                self.0.part_channel(name).await
            }
            async fn channel(&self, name: &str) -> Option<ChannelHandle> {
                self.0.channel(name).await
            }
            async fn send(&self, _h: &ChannelHandle, _t: &str) -> castpulse_core::Result<()> {
                Err(CastpulseError::Chat("dropped".into()))
            }
            async fn probe(&self, handle: &ChannelHandle) -> castpulse_core::Result<()> {
                self.0.probe(handle).await
            }
        }

        let inner = FakeSession::new();
        let ban_cache = Arc::new(TtlCache::new(Duration::from_secs(60)));
        let state = AppState::new(config("alpha"), ban_cache);
        let checker = Arc::new(StatusChecker::new(
            Arc::new(FakeProvider { live: true, following: true }),
            Arc::new(TtlCache::new(Duration::from_secs(300))),
        ));
        let scheduler = AnnounceScheduler::new(
            state,
            Arc::new(FailingSendSession(inner)),
            checker,
            Duration::from_secs(300),
        );

        let outcome = scheduler.run_tick(&config("alpha")).await.unwrap();
        assert_eq!(outcome, TickOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_start_and_shutdown_release_session() {
        let session = FakeSession::new();
        let (scheduler, state) =
            scheduler(session.clone(), FakeProvider { live: true, following: true }, config("alpha"));

        scheduler.start().await;
        scheduler.shutdown().await;

        let logs = state.recent_logs();
        assert_eq!(logs[0].message, "Scheduler stopped");
        // The initial join was parted on shutdown.
        assert!(session.events().contains(&"part:alpha".to_string()));
    }

    #[tokio::test]
    async fn test_fixed_wait_uses_interval_minutes() {
        let session = FakeSession::new();
        let mut cfg = config("alpha");
        cfg.interval_minutes = 7;
        let (scheduler, _state) =
            scheduler(session, FakeProvider { live: true, following: true }, cfg);
        assert_eq!(scheduler.next_wait().await, Duration::from_secs(7 * 60));
    }

    #[tokio::test]
    async fn test_random_wait_within_bounds() {
        let session = FakeSession::new();
        let mut cfg = config("alpha");
        cfg.random_interval = true;
        cfg.random_min_minutes = 2;
        cfg.random_max_minutes = 3;
        let (scheduler, _state) =
            scheduler(session, FakeProvider { live: true, following: true }, cfg);

        for _ in 0..10 {
            let wait = scheduler.next_wait().await;
            assert!(wait >= Duration::from_secs(120) && wait <= Duration::from_secs(180));
        }
    }

    #[tokio::test]
    async fn test_api_cache_populated_after_tick() {
        let session = FakeSession::new();
        let (scheduler, _state) =
            scheduler(session, FakeProvider { live: true, following: true }, config("alpha"));

        scheduler.run_tick(&config("alpha")).await.unwrap();
        let stats = scheduler.cache_stats();
        assert!(stats.api.size > 0);
        assert_eq!(stats.ban.size, 1);
        // The cached live flag is a real entry, not a stale read.
        assert_eq!(
            scheduler
                .checker
                .cache()
                .get(&"live_status:alpha".to_string()),
            Some(CachedValue::Flag(true))
        );
    }
}
