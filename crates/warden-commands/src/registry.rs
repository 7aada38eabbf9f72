//! Explicit registration table for native commands.
//!
//! Every built-in command is declared here (rather than discovered by
//! scanning), so the full set is visible in one place and duplicate
//! detection runs over a deterministic list.

use crate::command::HandlerFn;
use crate::handlers;
use crate::level::CommandLevel;

/// Declaration of one native command: the metadata the index needs plus
/// the handler to invoke.
#[derive(Debug, Clone, Copy)]
pub struct NativeCommand {
    /// Canonical name; contains a space for sub-commands.
    pub name: &'static str,
    /// Aliases, each a synonym for the first word of the name.
    pub aliases: &'static [&'static str],
    /// Help text shown in listings.
    pub description: &'static str,
    /// Level required to invoke the command.
    pub level: CommandLevel,
    /// Cooldown in seconds; 0 is unthrottled.
    pub cooldown_secs: u64,
    /// Whether the command appears in listing output.
    pub visible: bool,
    /// The handler function.
    pub handler: HandlerFn,
}

/// The full native command table.
#[must_use]
pub fn native_commands() -> Vec<NativeCommand> {
    vec![
        handlers::general::ping(),
        handlers::general::commands(),
        handlers::twitch::joinme(),
        handlers::twitch::leaveme(),
        handlers::twitch::followers(),
        handlers::twitch::uptime(),
        handlers::owner::owner(),
        handlers::owner::tjoin(),
        handlers::owner::pjoin(),
        handlers::owner::tleave(),
        handlers::owner::pleave(),
        handlers::owner::globalcom_add(),
        handlers::owner::globalcom_del(),
    ]
}
