//! Resolution of a chatter's effective permission weight.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;
use warden_commands::{CommandLevel, IdentityLookup, ProfileService, VIEWER_WEIGHT};
use warden_common::ChatMessage;

/// Maps a message author to a permission weight from the badges the
/// message carries, the configured owner list, and the follower graph.
pub struct TwitchIdentity {
    owners: HashSet<String>,
    profile: Arc<dyn ProfileService>,
}

impl TwitchIdentity {
    /// Creates an identity resolver for the given owner logins.
    #[must_use]
    pub fn new(owners: impl IntoIterator<Item = String>, profile: Arc<dyn ProfileService>) -> Self {
        Self {
            owners: owners.into_iter().map(|o| o.to_lowercase()).collect(),
            profile,
        }
    }
}

#[async_trait]
impl IdentityLookup for TwitchIdentity {
    async fn effective_weight(&self, message: &ChatMessage) -> i64 {
        if self.owners.contains(&message.author.login) {
            return CommandLevel::Owner.weight();
        }
        if message.author_is_broadcaster() {
            return CommandLevel::Broadcaster.weight();
        }
        if message.author.is_moderator {
            return CommandLevel::Moderator.weight();
        }
        if message.author.is_subscriber {
            return CommandLevel::Subscriber.weight();
        }

        // Follower last to prevent unnecessary API calls.
        if let (Some(user_id), Some(room_id)) = (&message.author.user_id, &message.room_id) {
            match self.profile.is_follower(user_id, room_id).await {
                Ok(true) => return CommandLevel::Follower.weight(),
                Ok(false) => {}
                Err(e) => {
                    // A failed lookup never grants privilege.
                    warn!("follower lookup for '{}' failed: {e}", message.author.login);
                }
            }
        }
        VIEWER_WEIGHT
    }
}
