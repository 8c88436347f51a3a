//! Live Twitch chat session over WebSocket IRC.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use castpulse_core::error::{CastpulseError, Result};
use castpulse_core::traits::{ChannelHandle, ChatSession};

use crate::irc::{self, IrcEvent};

const TWITCH_IRC_WS: &str = "wss://irc-ws.chat.twitch.tv:443";

/// How long the probe waits for a rejection NOTICE before reporting ok.
const PROBE_WINDOW: std::time::Duration = std::time::Duration::from_millis(400);

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsMessage>;
type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// A connected Twitch IRC session.
///
/// Join state is tracked optimistically on successful writes; rejection
/// NOTICEs observed by the reader task (bans, suspensions) mark channels
/// as unwritable, which is what the probe reports.
pub struct IrcSession {
    nick: String,
    writer: Arc<tokio::sync::Mutex<WsSink>>,
    joined: Mutex<HashSet<String>>,
    rejected: Mutex<HashSet<String>>,
}

impl IrcSession {
    /// Connect and authenticate. `token` is the `oauth:`-prefixed chat
    /// token; `login` the bot account name.
    pub async fn connect(login: &str, token: &str) -> Result<Arc<Self>> {
        let (ws, _response) = tokio_tungstenite::connect_async(TWITCH_IRC_WS)
            .await
            .map_err(|e| CastpulseError::Chat(format!("WebSocket connect failed: {e}")))?;
        let (sink, stream) = ws.split();

        let session = Arc::new(Self {
            nick: login.to_lowercase(),
            writer: Arc::new(tokio::sync::Mutex::new(sink)),
            joined: Mutex::new(HashSet::new()),
            rejected: Mutex::new(HashSet::new()),
        });

        session.send_raw("CAP REQ :twitch.tv/commands").await?;
        session.send_raw(&format!("PASS {token}")).await?;
        session.send_raw(&format!("NICK {}", session.nick)).await?;
        tracing::info!("Connected to Twitch IRC as {}", session.nick);

        let reader = session.clone();
        tokio::spawn(async move { reader.read_loop(stream).await });

        Ok(session)
    }

    async fn send_raw(&self, line: &str) -> Result<()> {
        self.writer
            .lock()
            .await
            .send(WsMessage::Text(format!("{line}\r\n")))
            .await
            .map_err(|e| CastpulseError::Chat(format!("IRC write failed: {e}")))
    }

    async fn read_loop(&self, mut stream: WsSource) {
        while let Some(msg) = stream.next().await {
            match msg {
                Ok(WsMessage::Text(text)) => {
                    for line in text.lines() {
                        self.handle_line(line).await;
                    }
                }
                Ok(WsMessage::Ping(data)) => {
                    let _ = self.writer.lock().await.send(WsMessage::Pong(data)).await;
                }
                Ok(WsMessage::Close(frame)) => {
                    tracing::info!("IRC WebSocket closed: {frame:?}");
                    break;
                }
                Err(e) => {
                    tracing::error!("IRC WebSocket error: {e}");
                    break;
                }
                _ => {}
            }
        }
        tracing::warn!("IRC reader loop ended");
    }

    async fn handle_line(&self, line: &str) {
        match irc::parse_line(line) {
            IrcEvent::Ping(payload) => {
                if let Err(e) = self.send_raw(&format!("PONG :{payload}")).await {
                    tracing::warn!("Failed to answer PING: {e}");
                }
            }
            IrcEvent::Notice {
                channel,
                msg_id,
                text,
            } => {
                if let Some(id) = msg_id.as_deref()
                    && irc::REJECTION_MSG_IDS.contains(&id)
                {
                    tracing::warn!("Channel {channel} rejects messages ({id}): {text}");
                    self.lock_set(&self.rejected).insert(channel);
                } else {
                    tracing::debug!("NOTICE {channel}: {text}");
                }
            }
            IrcEvent::Join { channel, nick } => {
                if nick == self.nick {
                    tracing::info!("Joined channel: {channel}");
                }
            }
            IrcEvent::Other => {}
        }
    }

    fn lock_set<'a>(&self, set: &'a Mutex<HashSet<String>>) -> std::sync::MutexGuard<'a, HashSet<String>> {
        set.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ChatSession for IrcSession {
    fn nick(&self) -> &str {
        &self.nick
    }

    async fn join_channel(&self, name: &str) -> Result<()> {
        let name = name.to_lowercase();
        self.send_raw(&format!("JOIN #{name}")).await?;
        self.lock_set(&self.joined).insert(name);
        Ok(())
    }

    async fn part_channel(&self, name: &str) -> Result<()> {
        let name = name.to_lowercase();
        self.send_raw(&format!("PART #{name}")).await?;
        self.lock_set(&self.joined).remove(&name);
        self.lock_set(&self.rejected).remove(&name);
        Ok(())
    }

    async fn channel(&self, name: &str) -> Option<ChannelHandle> {
        let name = name.to_lowercase();
        self.lock_set(&self.joined)
            .contains(&name)
            .then(|| ChannelHandle::new(name))
    }

    async fn send(&self, handle: &ChannelHandle, text: &str) -> Result<()> {
        if self.lock_set(&self.rejected).contains(&handle.name) {
            return Err(CastpulseError::Chat(format!(
                "Channel {} rejects messages from this session",
                handle.name
            )));
        }
        self.send_raw(&format!("PRIVMSG #{} :{text}", handle.name)).await
    }

    /// Probe writability by posting a zero-width space and waiting briefly
    /// for a rejection NOTICE. Side-effecting and best-effort.
    async fn probe(&self, handle: &ChannelHandle) -> Result<()> {
        self.send_raw(&format!("PRIVMSG #{} :\u{200b}", handle.name))
            .await?;
        tokio::time::sleep(PROBE_WINDOW).await;
        if self.lock_set(&self.rejected).contains(&handle.name) {
            return Err(CastpulseError::Chat(format!(
                "Probe rejected in channel {}",
                handle.name
            )));
        }
        Ok(())
    }
}
