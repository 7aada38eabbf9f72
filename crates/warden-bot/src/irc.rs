//! Minimal Twitch IRC (TMI) transport.
//!
//! Handles the login handshake, tag-capability negotiation, PING/PONG,
//! joining and parting channels, and parsing tagged PRIVMSG lines into
//! [`ChatMessage`] values. Everything else on the wire is ignored.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::io::{AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, info};
use warden_commands::ChatSink;
use warden_common::{Author, ChannelName, ChatMessage, Result, WardenError};
use warden_config::TwitchConfig;

/// One parsed inbound line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrcEvent {
    /// Server keepalive; must be answered with a PONG.
    Ping(String),
    /// A channel message.
    Message(ChatMessage),
    /// Anything the bot does not act on.
    Other,
}

/// Serialized write access to the IRC connection.
#[derive(Debug)]
pub struct IrcWriter {
    writer: Mutex<BufWriter<OwnedWriteHalf>>,
}

impl IrcWriter {
    /// Sends one raw IRC line, appending the line terminator.
    pub async fn send_raw(&self, line: &str) -> Result<()> {
        let mut writer = self.writer.lock().await;
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| WardenError::transport_with_source("write failed", e))?;
        writer
            .write_all(b"\r\n")
            .await
            .map_err(|e| WardenError::transport_with_source("write failed", e))?;
        writer
            .flush()
            .await
            .map_err(|e| WardenError::transport_with_source("flush failed", e))?;
        Ok(())
    }

    /// Joins a channel.
    pub async fn join(&self, channel: &ChannelName) -> Result<()> {
        info!("joining {}", channel.ircified());
        self.send_raw(&format!("JOIN {}", channel.ircified())).await
    }

    /// Parts a channel.
    pub async fn part(&self, channel: &ChannelName) -> Result<()> {
        info!("leaving {}", channel.ircified());
        self.send_raw(&format!("PART {}", channel.ircified())).await
    }
}

#[async_trait]
impl ChatSink for IrcWriter {
    async fn send(&self, channel: &ChannelName, text: &str) -> Result<()> {
        self.send_raw(&format!("PRIVMSG {} :{text}", channel.ircified()))
            .await
    }
}

/// An established, logged-in connection.
pub struct IrcConnection {
    /// Write half; shared with the dispatcher as the chat sink.
    pub writer: std::sync::Arc<IrcWriter>,
    /// Read half; consumed by the bot's read loop.
    pub reader: BufReader<OwnedReadHalf>,
}

/// Connects to the configured server and performs the login handshake.
pub async fn connect(config: &TwitchConfig) -> Result<IrcConnection> {
    let address = (config.host.as_str(), config.port);
    let stream = TcpStream::connect(address)
        .await
        .map_err(|e| WardenError::transport_with_source("cannot connect to IRC server", e))?;
    let (read_half, write_half) = stream.into_split();

    let writer = IrcWriter {
        writer: Mutex::new(BufWriter::new(write_half)),
    };
    writer
        .send_raw("CAP REQ :twitch.tv/tags twitch.tv/commands")
        .await?;
    writer.send_raw(&format!("PASS {}", config.token)).await?;
    writer
        .send_raw(&format!("NICK {}", config.nickname.to_lowercase()))
        .await?;
    debug!("logged in to {}:{}", config.host, config.port);

    Ok(IrcConnection {
        writer: std::sync::Arc::new(writer),
        reader: BufReader::new(read_half),
    })
}

/// Parses one inbound line into an [`IrcEvent`].
#[must_use]
pub fn parse_line(line: &str) -> IrcEvent {
    parse_line_inner(line).unwrap_or(IrcEvent::Other)
}

fn parse_line_inner(line: &str) -> Option<IrcEvent> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return None;
    }

    let (tags, rest) = if let Some(after) = line.strip_prefix('@') {
        let (raw, rest) = after.split_once(' ')?;
        (parse_tags(raw), rest)
    } else {
        (HashMap::new(), line)
    };

    let (prefix, rest) = if let Some(after) = rest.strip_prefix(':') {
        let (prefix, rest) = after.split_once(' ')?;
        (Some(prefix), rest)
    } else {
        (None, rest)
    };

    let (command, params) = rest.split_once(' ').map_or((rest, ""), |(c, p)| (c, p));
    match command {
        "PING" => Some(IrcEvent::Ping(
            params.trim_start_matches(':').to_string(),
        )),
        "PRIVMSG" => {
            let (target, trailing) = params.split_once(" :")?;
            let login = prefix?.split('!').next()?.to_lowercase();
            let display_name = tags
                .get("display-name")
                .filter(|name| !name.is_empty())
                .cloned()
                .unwrap_or_else(|| login.clone());

            let author = Author {
                display_name,
                user_id: tags.get("user-id").cloned(),
                is_moderator: has_flag(&tags, "mod")
                    || has_badge(&tags, "moderator")
                    || has_badge(&tags, "broadcaster"),
                is_subscriber: has_flag(&tags, "subscriber") || has_badge(&tags, "subscriber"),
                login,
            };
            Some(IrcEvent::Message(ChatMessage {
                channel: ChannelName::new(target.trim()),
                room_id: tags.get("room-id").cloned(),
                author,
                text: trailing.to_string(),
                sent_at: Utc::now(),
            }))
        }
        _ => Some(IrcEvent::Other),
    }
}

fn parse_tags(raw: &str) -> HashMap<String, String> {
    raw.split(';')
        .filter_map(|tag| {
            let (key, value) = tag.split_once('=')?;
            Some((key.to_string(), unescape_tag_value(value)))
        })
        .collect()
}

/// IRCv3 tag value unescaping: `\s` space, `\:` semicolon, `\\`
/// backslash, `\r`/`\n` line breaks.
fn unescape_tag_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some(':') => out.push(';'),
            Some('\\') => out.push('\\'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn has_flag(tags: &HashMap<String, String>, key: &str) -> bool {
    tags.get(key).is_some_and(|value| value == "1")
}

fn has_badge(tags: &HashMap<String, String>, name: &str) -> bool {
    tags.get("badges").is_some_and(|badges| {
        badges
            .split(',')
            .any(|badge| badge.split('/').next() == Some(name))
    })
}
