//! Commands backed by the channel roster and the profile service.

use crate::command::HandlerFuture;
use crate::context::CommandContext;
use crate::level::CommandLevel;
use crate::registry::NativeCommand;
use chrono::Utc;
use tracing::warn;
use warden_common::{duration::ydhms_string, ChannelName};

/// Asks the bot to permanently join the caller's own channel.
#[must_use]
pub fn joinme() -> NativeCommand {
    NativeCommand {
        name: "joinme",
        aliases: &[],
        description: "The bot joins your channel",
        level: CommandLevel::All,
        cooldown_secs: 0,
        visible: false,
        handler: joinme_handler,
    }
}

fn joinme_handler(ctx: CommandContext) -> HandlerFuture {
    Box::pin(async move {
        let channel = ChannelName::new(&ctx.message.author.login);
        ctx.services.channels.join(&channel, true).await?;
        ctx.mention("Sure thing! See you over in your channel! \u{1f916}")
            .await
    })
}

/// Asks the bot to permanently leave the caller's own channel.
#[must_use]
pub fn leaveme() -> NativeCommand {
    NativeCommand {
        name: "leaveme",
        aliases: &[],
        description: "The bot leaves your channel",
        level: CommandLevel::All,
        cooldown_secs: 0,
        visible: false,
        handler: leaveme_handler,
    }
}

fn leaveme_handler(ctx: CommandContext) -> HandlerFuture {
    Box::pin(async move {
        let channel = ChannelName::new(&ctx.message.author.login);
        ctx.services.channels.part(&channel, true).await?;
        ctx.mention("It's not you, it's me ... \u{1f494}").await
    })
}

/// Reports the channel's follower count.
#[must_use]
pub fn followers() -> NativeCommand {
    NativeCommand {
        name: "followers",
        aliases: &[],
        description: "Shows the channel's follower count",
        level: CommandLevel::Moderator,
        cooldown_secs: 0,
        visible: true,
        handler: followers_handler,
    }
}

fn followers_handler(ctx: CommandContext) -> HandlerFuture {
    Box::pin(async move {
        let Some(room_id) = ctx.message.room_id.clone() else {
            return ctx.failure_mention("Could not identify the channel.").await;
        };
        match ctx.services.profile.follower_count(&room_id).await {
            Ok(count) => {
                ctx.mention(&format!("The channel has {count} followers."))
                    .await
            }
            Err(e) => {
                warn!("follower count lookup failed: {e}");
                ctx.failure_mention("An error occurred while fetching the follower count.")
                    .await
            }
        }
    })
}

/// Reports how long the stream has been live.
#[must_use]
pub fn uptime() -> NativeCommand {
    NativeCommand {
        name: "uptime",
        aliases: &[],
        description: "Shows how long the stream has been live",
        level: CommandLevel::All,
        cooldown_secs: 20,
        visible: true,
        handler: uptime_handler,
    }
}

fn uptime_handler(ctx: CommandContext) -> HandlerFuture {
    Box::pin(async move {
        let Some(room_id) = ctx.message.room_id.clone() else {
            return ctx.failure_mention("Could not identify the channel.").await;
        };
        match ctx.services.profile.stream_started_at(&room_id).await {
            Ok(Some(started_at)) => {
                let elapsed =
                    u64::try_from((Utc::now() - started_at).num_seconds()).unwrap_or_default();
                ctx.mention(&format!(
                    "The stream has been live for: {}",
                    ydhms_string(elapsed)
                ))
                .await
            }
            Ok(None) => ctx.mention("The channel is not currently live.").await,
            Err(e) => {
                warn!("stream lookup failed: {e}");
                ctx.failure_mention("An error occurred while fetching stream info.")
                    .await
            }
        }
    })
}
