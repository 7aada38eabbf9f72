//! Commands reserved for the bot owner.

use crate::command::HandlerFuture;
use crate::context::CommandContext;
use crate::level::CommandLevel;
use crate::registry::NativeCommand;
use tracing::warn;
use warden_common::{ChannelName, Result};

/// Beep boop.
#[must_use]
pub fn owner() -> NativeCommand {
    NativeCommand {
        name: "owner",
        aliases: &[],
        description: "Owner liveness check",
        level: CommandLevel::Owner,
        cooldown_secs: 0,
        visible: false,
        handler: owner_handler,
    }
}

fn owner_handler(ctx: CommandContext) -> HandlerFuture {
    Box::pin(async move { ctx.mention("Beep boop").await })
}

/// Temporarily join a channel, until the next restart.
#[must_use]
pub fn tjoin() -> NativeCommand {
    NativeCommand {
        name: "tjoin",
        aliases: &[],
        description: "Temporarily join a channel",
        level: CommandLevel::Owner,
        cooldown_secs: 0,
        visible: false,
        handler: |ctx| Box::pin(join_leave(ctx, true, false)),
    }
}

/// Permanently join a channel, adding it to the initial channel list.
#[must_use]
pub fn pjoin() -> NativeCommand {
    NativeCommand {
        name: "pjoin",
        aliases: &[],
        description: "Permanently join a channel",
        level: CommandLevel::Owner,
        cooldown_secs: 0,
        visible: false,
        handler: |ctx| Box::pin(join_leave(ctx, true, true)),
    }
}

/// Temporarily leave a channel, until the next restart.
#[must_use]
pub fn tleave() -> NativeCommand {
    NativeCommand {
        name: "tleave",
        aliases: &[],
        description: "Temporarily leave a channel",
        level: CommandLevel::Owner,
        cooldown_secs: 0,
        visible: false,
        handler: |ctx| Box::pin(join_leave(ctx, false, false)),
    }
}

/// Permanently leave a channel, removing it from the initial channel list.
#[must_use]
pub fn pleave() -> NativeCommand {
    NativeCommand {
        name: "pleave",
        aliases: &[],
        description: "Permanently leave a channel",
        level: CommandLevel::Owner,
        cooldown_secs: 0,
        visible: false,
        handler: |ctx| Box::pin(join_leave(ctx, false, true)),
    }
}

async fn join_leave(ctx: CommandContext, is_join: bool, permanent: bool) -> Result<()> {
    // Expect exactly one channel name; anything else is silently ignored.
    let Some(login) = ctx
        .args
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty() && !a.contains(' '))
        .map(str::to_lowercase)
    else {
        return Ok(());
    };

    let valid = match ctx.services.profile.user_exists(&login).await {
        Ok(valid) => valid,
        Err(e) => {
            warn!("user lookup for '{login}' failed: {e}");
            false
        }
    };
    if !valid {
        return ctx
            .failure_mention("That user was not identified as a valid channel/user.")
            .await;
    }

    let channel = ChannelName::new(&login);
    if is_join {
        ctx.services.channels.join(&channel, permanent).await?;
        ctx.mention(&format!("Joining channel: {login}")).await
    } else {
        ctx.services.channels.part(&channel, permanent).await?;
        ctx.mention(&format!("Leaving channel: {login}")).await
    }
}

/// Add a global custom command.
///
/// Syntax: `[p]globalcom add {name} {response text}`
#[must_use]
pub fn globalcom_add() -> NativeCommand {
    NativeCommand {
        name: "globalcom add",
        aliases: &[],
        description: "Add a global custom command",
        level: CommandLevel::Owner,
        cooldown_secs: 0,
        visible: false,
        handler: globalcom_add_handler,
    }
}

fn globalcom_add_handler(ctx: CommandContext) -> HandlerFuture {
    Box::pin(async move {
        let parts = ctx.split_args(2);
        if parts.len() < 2 {
            return ctx.failure_mention("Invalid format for command add.").await;
        }
        let name = parts[0].trim().to_lowercase();
        let response = parts[1].trim();
        if name.is_empty() || response.is_empty() {
            return ctx.failure_mention("Invalid format for command add.").await;
        }

        if ctx.services.index.contains_trigger(&name, false) {
            return ctx
                .failure_mention("A global command with that name or alias already exists.")
                .await;
        }

        match ctx
            .services
            .index
            .add_custom(&name, None, response, CommandLevel::All)
            .await
        {
            Ok(_) => {
                ctx.success_mention(&format!("Added global command: {name}"))
                    .await
            }
            Err(e) => {
                warn!("failed to add custom command '{name}': {e}");
                ctx.failure_mention("Failed to save the command.").await
            }
        }
    })
}

/// Remove a global custom command.
///
/// Syntax: `[p]globalcom del {name}`
#[must_use]
pub fn globalcom_del() -> NativeCommand {
    NativeCommand {
        name: "globalcom del",
        aliases: &[],
        description: "Remove a global custom command",
        level: CommandLevel::Owner,
        cooldown_secs: 0,
        visible: false,
        handler: globalcom_del_handler,
    }
}

fn globalcom_del_handler(ctx: CommandContext) -> HandlerFuture {
    Box::pin(async move {
        let Some(name) = ctx
            .args
            .as_deref()
            .and_then(|args| args.split_whitespace().next())
            .map(str::to_lowercase)
        else {
            return ctx
                .failure_mention("Invalid format for command delete.")
                .await;
        };

        if !ctx.services.index.contains_trigger(&name, true) {
            return ctx
                .failure_mention(&format!("Did not find a global custom command: {name}"))
                .await;
        }

        match ctx.services.index.remove_custom(&name).await {
            Ok(_) => {
                ctx.success_mention(&format!("Removed global command: {name}"))
                    .await
            }
            Err(e) => {
                warn!("failed to remove custom command '{name}': {e}");
                ctx.failure_mention("Failed to remove the command.").await
            }
        }
    })
}
