//! Collaborator contracts consumed by the engine and its native handlers.
//!
//! All of these are implemented outside the engine (transport, profile
//! service, persistence); the engine never manages their lifecycles.

use crate::index::CommandIndex;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use warden_common::{ChannelName, ChatMessage, Result};

/// Resolves a caller's effective permission weight.
///
/// Implementations should order their checks cheapest first (owner and
/// badge checks before follower lookups) and degrade to the lowest
/// privilege on any external failure, never raising an error into the
/// dispatch path.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    /// The caller's effective weight for the channel the message was
    /// sent to.
    async fn effective_weight(&self, message: &ChatMessage) -> i64;
}

/// Outbound chat messages.
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Sends a message to a channel.
    async fn send(&self, channel: &ChannelName, text: &str) -> Result<()>;
}

/// Joining and leaving channels on the transport.
#[async_trait]
pub trait ChannelControl: Send + Sync {
    /// Joins a channel; a permanent join is also recorded in the channel
    /// roster so the bot rejoins after a restart.
    async fn join(&self, channel: &ChannelName, permanent: bool) -> Result<()>;

    /// Leaves a channel; a permanent leave also removes it from the
    /// channel roster.
    async fn part(&self, channel: &ChannelName, permanent: bool) -> Result<()>;
}

/// Read-only profile and social-graph lookups.
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Whether a login names an existing user.
    async fn user_exists(&self, login: &str) -> Result<bool>;

    /// Whether the user follows the channel.
    async fn is_follower(&self, user_id: &str, room_id: &str) -> Result<bool>;

    /// Number of followers of the channel.
    async fn follower_count(&self, room_id: &str) -> Result<u64>;

    /// Start time of the channel's live stream, or `None` when offline.
    async fn stream_started_at(&self, room_id: &str) -> Result<Option<DateTime<Utc>>>;
}

/// Bundle of collaborators handed to native command handlers.
pub struct Services {
    /// The live command index, for listing and administrative commands.
    pub index: Arc<CommandIndex>,
    /// Outbound chat.
    pub sink: Arc<dyn ChatSink>,
    /// Channel join/leave control.
    pub channels: Arc<dyn ChannelControl>,
    /// Profile service.
    pub profile: Arc<dyn ProfileService>,
    /// The command prefix, for listing output.
    pub prefix: String,
}
