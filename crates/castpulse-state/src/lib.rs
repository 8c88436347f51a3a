//! # Castpulse State
//!
//! Centralized application state shared between the control surface
//! (producer) and the scheduler (consumer).
//!
//! The two sides never touch mutable state directly: configuration is an
//! atomically-replaced `Arc` snapshot, runtime changes travel through a
//! FIFO command queue, and operational events flow out through a bounded
//! log ring plus a broadcast stream. Issuing a command never waits on the
//! scheduler.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc};

use castpulse_cache::TtlCache;
use castpulse_core::config::BotConfig;
use castpulse_core::types::{Command, LogEntry, LogLevel, SettingsUpdate};

/// Ring buffer capacity for replayable logs.
pub const LOG_CAPACITY: usize = 100;

/// Broadcast buffer for live log tailing; lagging receivers miss entries
/// rather than blocking the producer.
const LOG_STREAM_CAPACITY: usize = 256;

/// Cache key for the local ban heuristic's verdict on a channel.
pub fn ban_cache_key(channel: &str) -> String {
    format!("banned_status:{}", channel.to_lowercase())
}

/// Owned application state.
pub struct AppState {
    config: RwLock<Arc<BotConfig>>,
    commands_tx: mpsc::UnboundedSender<Command>,
    commands_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<Command>>,
    logs: Mutex<VecDeque<LogEntry>>,
    log_tx: broadcast::Sender<LogEntry>,
    ban_cache: Arc<TtlCache<String, bool>>,
    started_at: Instant,
}

impl AppState {
    pub fn new(initial: BotConfig, ban_cache: Arc<TtlCache<String, bool>>) -> Arc<Self> {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (log_tx, _) = broadcast::channel(LOG_STREAM_CAPACITY);
        Arc::new(Self {
            config: RwLock::new(Arc::new(initial)),
            commands_tx,
            commands_rx: tokio::sync::Mutex::new(commands_rx),
            logs: Mutex::new(VecDeque::with_capacity(LOG_CAPACITY)),
            log_tx,
            ban_cache,
            started_at: Instant::now(),
        })
    }

    /// Current configuration snapshot. The snapshot is immutable — readers
    /// never observe a mix of old and new fields.
    pub fn config(&self) -> Arc<BotConfig> {
        self.config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Build the next snapshot from the current one under the write lock
    /// and swap it in whole. Returns the replaced snapshot.
    fn mutate_config<F>(&self, f: F) -> Arc<BotConfig>
    where
        F: FnOnce(&BotConfig) -> BotConfig,
    {
        let mut guard = self.config.write().unwrap_or_else(|e| e.into_inner());
        let next = Arc::new(f(&guard));
        std::mem::replace(&mut *guard, next)
    }

    /// Apply new settings. Always succeeds locally: the snapshot is
    /// replaced atomically and an `ApplySettings` command carrying the
    /// prior channel is enqueued for the scheduler.
    pub fn update_settings(&self, mut update: SettingsUpdate) {
        update.normalize();
        let old = self.mutate_config(|cfg| cfg.with_update(&update));

        self.append_log(
            LogLevel::Info,
            format!(
                "Settings updated - Channel: {}, Interval: {}min, Ignore Live: {}, Random: {}",
                update.channel,
                update.interval_minutes,
                update.ignore_live_status,
                update.random_interval
            ),
            Some("State"),
        );

        self.enqueue(Command::ApplySettings {
            update,
            old_channel: old.channel.clone(),
        });
    }

    /// Toggle the active flag. Activation is refused — state unchanged,
    /// returns false — while the ban cache holds a positive verdict for
    /// the current channel. Deactivation always succeeds.
    pub fn toggle(&self, active: bool) -> bool {
        if active {
            let channel = self.config().channel.clone();
            if self.ban_cache.get(&ban_cache_key(&channel)) == Some(true) {
                self.append_log(
                    LogLevel::Error,
                    format!("Cannot activate: banned from {channel}"),
                    Some("State"),
                );
                return false;
            }
        }

        self.mutate_config(|cfg| {
            let mut next = cfg.clone();
            next.active = active;
            next
        });
        self.enqueue(Command::ToggleActive(active));

        let status = if active { "activated" } else { "deactivated" };
        self.append_log(LogLevel::Info, format!("Bot {status}"), Some("State"));
        true
    }

    fn enqueue(&self, command: Command) {
        // Unbounded channel: the producer never waits on the scheduler.
        // The send only fails after shutdown, when nobody drains anyway.
        if self.commands_tx.send(command).is_err() {
            tracing::warn!("Command dropped: scheduler queue closed");
        }
    }

    /// Await the next command, up to `timeout`. Used only by the scheduler;
    /// commands come out strictly in issue order.
    pub async fn drain_command(&self, timeout: Duration) -> Option<Command> {
        let mut rx = self.commands_rx.lock().await;
        tokio::time::timeout(timeout, rx.recv()).await.ok().flatten()
    }

    /// Append a log entry. Never blocks: the ring drops its oldest entry
    /// on overflow and the broadcast send is non-blocking.
    pub fn append_log(&self, level: LogLevel, message: impl Into<String>, source: Option<&str>) {
        let entry = LogEntry::new(level, message, source);
        {
            let mut logs = self.logs.lock().unwrap_or_else(|e| e.into_inner());
            if logs.len() == LOG_CAPACITY {
                logs.pop_back();
            }
            logs.push_front(entry.clone());
        }
        let _ = self.log_tx.send(entry);
    }

    /// Newest-first snapshot of the retained log ring.
    pub fn recent_logs(&self) -> Vec<LogEntry> {
        self.logs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    /// Replay-then-tail: a chronological snapshot of retained entries plus
    /// a live receiver. Both are taken under the ring lock, so an entry
    /// appears in exactly one of the two and global order is preserved.
    pub fn tail(&self) -> (Vec<LogEntry>, broadcast::Receiver<LogEntry>) {
        let logs = self.logs.lock().unwrap_or_else(|e| e.into_inner());
        let rx = self.log_tx.subscribe();
        let replay = logs.iter().rev().cloned().collect();
        (replay, rx)
    }

    /// The ban-status cache this state consults on activation.
    pub fn ban_cache(&self) -> &Arc<TtlCache<String, bool>> {
        &self.ban_cache
    }

    /// Process uptime in whole seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> Arc<AppState> {
        let ban_cache = Arc::new(TtlCache::new(Duration::from_secs(60)));
        let initial = BotConfig {
            channel: "alpha".into(),
            ..Default::default()
        };
        AppState::new(initial, ban_cache)
    }

    #[tokio::test]
    async fn test_update_settings_replaces_snapshot_and_enqueues() {
        let state = state();
        let before = state.config();

        state.update_settings(SettingsUpdate {
            channel: "Beta".into(),
            message: "hey".into(),
            interval_minutes: 10,
            ignore_live_status: true,
            random_interval: false,
            random_min_minutes: 20,
            random_max_minutes: 60,
        });

        let after = state.config();
        assert_eq!(after.channel, "beta");
        assert_eq!(after.interval_minutes, 10);
        // Old snapshot untouched.
        assert_eq!(before.channel, "alpha");

        match state.drain_command(Duration::from_millis(50)).await {
            Some(Command::ApplySettings {
                update,
                old_channel,
            }) => {
                assert_eq!(update.channel, "beta");
                assert_eq!(old_channel, "alpha");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_commands_drain_in_fifo_order() {
        let state = state();
        state.toggle(true);
        state.update_settings(SettingsUpdate {
            channel: "beta".into(),
            message: "m".into(),
            interval_minutes: 5,
            ignore_live_status: false,
            random_interval: false,
            random_min_minutes: 20,
            random_max_minutes: 60,
        });
        state.toggle(false);

        let c1 = state.drain_command(Duration::from_millis(50)).await;
        let c2 = state.drain_command(Duration::from_millis(50)).await;
        let c3 = state.drain_command(Duration::from_millis(50)).await;
        assert!(matches!(c1, Some(Command::ToggleActive(true))));
        assert!(matches!(c2, Some(Command::ApplySettings { .. })));
        assert!(matches!(c3, Some(Command::ToggleActive(false))));
        assert!(
            state.drain_command(Duration::from_millis(10)).await.is_none(),
            "queue should be empty"
        );
    }

    #[tokio::test]
    async fn test_toggle_idempotent_one_command_per_call() {
        let state = state();
        assert!(state.toggle(true));
        assert!(state.toggle(true));
        assert!(state.config().active);

        assert!(matches!(
            state.drain_command(Duration::from_millis(50)).await,
            Some(Command::ToggleActive(true))
        ));
        assert!(matches!(
            state.drain_command(Duration::from_millis(50)).await,
            Some(Command::ToggleActive(true))
        ));
    }

    #[tokio::test]
    async fn test_toggle_refused_while_banned() {
        let state = state();
        state.ban_cache().set(ban_cache_key("alpha"), true);

        assert!(!state.toggle(true));
        assert!(!state.config().active, "active flag must remain false");
        assert!(
            state.drain_command(Duration::from_millis(10)).await.is_none(),
            "no command should be enqueued on refusal"
        );

        // Deactivation is never gated.
        assert!(state.toggle(false));
    }

    #[tokio::test]
    async fn test_toggle_allowed_after_ban_entry_expires() {
        let ban_cache: Arc<TtlCache<String, bool>> =
            Arc::new(TtlCache::new(Duration::from_secs(0)));
        let state = AppState::new(
            BotConfig {
                channel: "alpha".into(),
                ..Default::default()
            },
            ban_cache,
        );
        state.ban_cache().set(ban_cache_key("alpha"), true);
        // TTL of zero: the entry is already stale.
        assert!(state.toggle(true));
    }

    #[test]
    fn test_log_ring_bounded_newest_first() {
        let state = state();
        for i in 0..(LOG_CAPACITY + 10) {
            state.append_log(LogLevel::Info, format!("entry {i}"), None);
        }
        let logs = state.recent_logs();
        assert_eq!(logs.len(), LOG_CAPACITY);
        assert_eq!(logs[0].message, format!("entry {}", LOG_CAPACITY + 9));
        assert_eq!(logs.last().unwrap().message, "entry 10");
    }

    #[tokio::test]
    async fn test_tail_replays_then_streams_in_order() {
        let state = state();
        state.append_log(LogLevel::Info, "first", None);
        state.append_log(LogLevel::Info, "second", None);

        let (replay, mut rx) = state.tail();
        assert_eq!(replay.len(), 2);
        assert_eq!(replay[0].message, "first");
        assert_eq!(replay[1].message, "second");

        state.append_log(LogLevel::Info, "third", None);
        let live = rx.recv().await.unwrap();
        assert_eq!(live.message, "third");
    }
}
