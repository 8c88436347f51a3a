//! Minimal IRC line parsing for the Twitch chat protocol.
//!
//! Only the commands the session cares about are modeled; everything else
//! is `Other`.

/// A parsed inbound IRC line.
#[derive(Debug, Clone, PartialEq)]
pub enum IrcEvent {
    /// Server keepalive; must be answered with `PONG <payload>`.
    Ping(String),
    /// Server notice for a channel, e.g. ban or suspension messages.
    Notice {
        channel: String,
        msg_id: Option<String>,
        text: String,
    },
    /// A user joined a channel.
    Join { channel: String, nick: String },
    Other,
}

/// NOTICE msg-ids that mean this session cannot post to the channel.
pub const REJECTION_MSG_IDS: &[&str] = &[
    "msg_banned",
    "msg_channel_suspended",
    "msg_rejected",
    "msg_timedout",
];

/// Parse one raw IRC line.
pub fn parse_line(line: &str) -> IrcEvent {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return IrcEvent::Other;
    }

    // Optional IRCv3 tags: `@key=value;key2=value2 <rest>`
    let (tags, rest) = if let Some(tagged) = line.strip_prefix('@') {
        match tagged.split_once(' ') {
            Some((tags, rest)) => (Some(tags), rest),
            None => (None, line),
        }
    } else {
        (None, line)
    };

    if let Some(payload) = rest.strip_prefix("PING ") {
        return IrcEvent::Ping(payload.trim_start_matches(':').to_string());
    }

    // `:prefix COMMAND args :trailing`
    let (prefix, after_prefix) = if let Some(prefixed) = rest.strip_prefix(':') {
        match prefixed.split_once(' ') {
            Some((prefix, rest)) => (Some(prefix), rest),
            None => (None, rest),
        }
    } else {
        (None, rest)
    };

    let mut parts = after_prefix.splitn(2, ' ');
    let command = parts.next().unwrap_or_default();
    let args = parts.next().unwrap_or_default();

    match command {
        "NOTICE" => {
            let (channel, text) = match args.split_once(" :") {
                Some((chan, text)) => (chan, text),
                None => (args, ""),
            };
            IrcEvent::Notice {
                channel: channel.trim_start_matches('#').to_string(),
                msg_id: tags.and_then(tag_value_msg_id),
                text: text.to_string(),
            }
        }
        "JOIN" => {
            let nick = prefix
                .and_then(|p| p.split('!').next())
                .unwrap_or_default()
                .to_string();
            IrcEvent::Join {
                channel: args.trim_start_matches(':').trim_start_matches('#').to_string(),
                nick,
            }
        }
        _ => IrcEvent::Other,
    }
}

fn tag_value_msg_id(tags: &str) -> Option<String> {
    tags.split(';').find_map(|kv| {
        kv.strip_prefix("msg-id=")
            .map(|v| v.to_string())
            .filter(|v| !v.is_empty())
    })
}
