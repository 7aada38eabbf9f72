//! Chat message and author models shared across the workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Twitch channel name, stored without the leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelName(pub String);

impl ChannelName {
    /// Creates a channel name, stripping any leading `#` and lowercasing.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim_start_matches('#').to_lowercase())
    }

    /// Returns the name formatted as an IRC channel, e.g. `#sep`.
    #[must_use]
    pub fn ircified(&self) -> String {
        format!("#{}", self.0)
    }

    /// Returns the bare channel name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The author of a channel message, with the channel-scoped state carried
/// in Twitch message tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Lowercase Twitch login of the author.
    pub login: String,
    /// Display name as chosen by the user; falls back to the login.
    pub display_name: String,
    /// Twitch user id from the `user-id` tag, when present.
    pub user_id: Option<String>,
    /// Whether the author holds a moderator badge in the channel.
    pub is_moderator: bool,
    /// Whether the author holds a subscriber badge in the channel.
    pub is_subscriber: bool,
}

impl Author {
    /// Returns the author's mention string, e.g. `@Sep`.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("@{}", self.display_name)
    }
}

/// A single message received in a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Channel the message was sent to.
    pub channel: ChannelName,
    /// Twitch room id of the channel from the `room-id` tag, when present.
    pub room_id: Option<String>,
    /// Message author.
    pub author: Author,
    /// Raw message text.
    pub text: String,
    /// Time the message was observed by the bot.
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Returns `true` if the author is the channel's broadcaster.
    #[must_use]
    pub fn author_is_broadcaster(&self) -> bool {
        self.author.login == self.channel.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(login: &str) -> Author {
        Author {
            login: login.to_string(),
            display_name: login.to_string(),
            user_id: None,
            is_moderator: false,
            is_subscriber: false,
        }
    }

    #[test]
    fn test_channel_name_normalization() {
        assert_eq!(ChannelName::new("#SepGG").as_str(), "sepgg");
        assert_eq!(ChannelName::new("sepgg").ircified(), "#sepgg");
    }

    #[test]
    fn test_broadcaster_detection() {
        let message = ChatMessage {
            channel: ChannelName::new("#sep"),
            room_id: None,
            author: author("sep"),
            text: "+ping".to_string(),
            sent_at: Utc::now(),
        };
        assert!(message.author_is_broadcaster());

        let other = ChatMessage {
            author: author("viewer"),
            ..message
        };
        assert!(!other.author_is_broadcaster());
    }
}
