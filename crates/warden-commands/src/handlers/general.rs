//! General-purpose commands available in every channel.

use crate::command::HandlerFuture;
use crate::context::CommandContext;
use crate::level::CommandLevel;
use crate::registry::NativeCommand;

/// Replies "Pong!" to the channel's broadcaster.
#[must_use]
pub fn ping() -> NativeCommand {
    NativeCommand {
        name: "ping",
        aliases: &[],
        description: "Replies with Pong!",
        level: CommandLevel::Broadcaster,
        cooldown_secs: 0,
        visible: true,
        handler: ping_handler,
    }
}

fn ping_handler(ctx: CommandContext) -> HandlerFuture {
    Box::pin(async move { ctx.mention("Pong!").await })
}

/// Lists the visible commands the caller is allowed to run.
#[must_use]
pub fn commands() -> NativeCommand {
    NativeCommand {
        name: "commands",
        aliases: &["help"],
        description: "Lists the commands you can run",
        level: CommandLevel::All,
        cooldown_secs: 0,
        visible: true,
        handler: commands_handler,
    }
}

fn commands_handler(ctx: CommandContext) -> HandlerFuture {
    Box::pin(async move {
        let listing: Vec<String> = ctx
            .services
            .index
            .listable_commands(ctx.caller_weight)
            .into_iter()
            .filter(|name| name != "commands")
            .map(|name| format!("{}{name}", ctx.services.prefix))
            .collect();

        let line = if listing.is_empty() {
            "No commands available.".to_string()
        } else {
            listing.join(", ")
        };
        ctx.reply(&format!("{}: {line}", ctx.message.author.mention()))
            .await
    })
}
