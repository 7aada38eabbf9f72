//! Dispatch context handed to native command handlers.

use crate::command::Command;
use crate::services::Services;
use std::sync::Arc;
use warden_common::{reply, ChatMessage, Result};

/// Everything a native handler may need: the matched command, the argument
/// text, the triggering message, the caller's resolved weight, and the
/// collaborators for replying and acting.
pub struct CommandContext {
    /// The matched command.
    pub command: Arc<Command>,
    /// Text after the matched trigger, trimmed; `None` when nothing
    /// followed the trigger (distinct from an empty argument).
    pub args: Option<String>,
    /// The message which triggered the command.
    pub message: ChatMessage,
    /// The caller's effective permission weight, as resolved for this
    /// dispatch.
    pub caller_weight: i64,
    /// Collaborator bundle.
    pub services: Arc<Services>,
}

impl CommandContext {
    /// Sends a reply to the channel which triggered the command.
    pub async fn reply(&self, text: &str) -> Result<()> {
        self.services.sink.send(&self.message.channel, text).await
    }

    /// Replies, mentioning the author.
    pub async fn mention(&self, text: &str) -> Result<()> {
        self.reply(&reply::mention(text, &self.message.author)).await
    }

    /// Replies with the success decoration, mentioning the author.
    pub async fn success_mention(&self, text: &str) -> Result<()> {
        self.reply(&reply::success_mention(text, &self.message.author))
            .await
    }

    /// Replies with the failure decoration, mentioning the author.
    pub async fn failure_mention(&self, text: &str) -> Result<()> {
        self.reply(&reply::failure_mention(text, &self.message.author))
            .await
    }

    /// Splits the argument text on spaces into at most `max` parts; the
    /// last part keeps the remaining text. Empty when there were no
    /// arguments.
    #[must_use]
    pub fn split_args(&self, max: usize) -> Vec<String> {
        self.args
            .as_deref()
            .map(|args| args.splitn(max, ' ').map(str::to_string).collect())
            .unwrap_or_default()
    }
}
