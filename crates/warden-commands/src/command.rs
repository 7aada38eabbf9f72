//! Command model: definitions, trigger trees, and the duplicate predicate.

use crate::context::CommandContext;
use crate::cooldown::CooldownGate;
use crate::level::CommandLevel;
use crate::registry::NativeCommand;
use crate::store::{CustomCommandRecord, RecordError};
use futures::future::BoxFuture;
use std::collections::BTreeSet;
use std::time::Duration;

/// Boxed future returned by native command handlers.
pub type HandlerFuture = BoxFuture<'static, warden_common::Result<()>>;

/// A native command handler function.
pub type HandlerFn = fn(CommandContext) -> HandlerFuture;

/// What a command does when invoked.
#[derive(Debug)]
pub enum Action {
    /// Invoke a native handler with the dispatch context.
    Native(HandlerFn),
    /// Emit externally supplied response text verbatim.
    Custom {
        /// The stored response text.
        response: String,
    },
}

/// Immutable description of one command, either native or custom.
///
/// Each definition owns its cooldown gate, so definitions are shared as
/// `Arc<Command>` rather than cloned.
#[derive(Debug)]
pub struct Command {
    name: String,
    description: String,
    aliases: BTreeSet<String>,
    action: Action,
    level: CommandLevel,
    cooldown: CooldownGate,
    visible: bool,
}

impl Command {
    /// Builds a command from a native declaration.
    #[must_use]
    pub fn from_native(decl: &NativeCommand) -> Self {
        Self {
            name: decl.name.to_lowercase(),
            description: decl.description.to_string(),
            aliases: decl.aliases.iter().map(|a| a.to_lowercase()).collect(),
            action: Action::Native(decl.handler),
            level: decl.level,
            cooldown: CooldownGate::new(Duration::from_secs(decl.cooldown_secs)),
            visible: decl.visible,
        }
    }

    /// Builds a command from a persisted custom record.
    ///
    /// Fails when a numeric field is malformed; a failed record is dropped
    /// by the caller rather than loaded with defaults.
    pub fn from_record(record: &CustomCommandRecord) -> Result<Self, RecordError> {
        let level = record.parsed_level()?;
        let cooldown_secs = record.parsed_cooldown()?;
        Ok(Self {
            name: record.name.trim().to_lowercase(),
            description: record.description.clone().unwrap_or_default(),
            aliases: record.alias_list().into_iter().collect(),
            action: Action::Custom {
                response: record.response.clone(),
            },
            level,
            cooldown: CooldownGate::new(Duration::from_secs(cooldown_secs)),
            visible: record.parsed_visibility(),
        })
    }

    /// Canonical lowercase name; contains a space for sub-commands.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help text for the command.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Level required to invoke the command.
    #[must_use]
    pub const fn level(&self) -> CommandLevel {
        self.level
    }

    /// Whether the command appears in listing output.
    #[must_use]
    pub const fn visible(&self) -> bool {
        self.visible
    }

    /// Whether this is a custom (externally defined) command.
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self.action, Action::Custom { .. })
    }

    /// The command's action.
    #[must_use]
    pub const fn action(&self) -> &Action {
        &self.action
    }

    /// The command's cooldown gate.
    #[must_use]
    pub const fn cooldown(&self) -> &CooldownGate {
        &self.cooldown
    }

    /// All first-word trigger tokens: the first word of the name plus
    /// every alias.
    #[must_use]
    pub fn trigger_words(&self) -> BTreeSet<String> {
        let mut words = self.aliases.clone();
        if let Some(first) = self.name.split(' ').next() {
            words.insert(first.to_string());
        }
        words
    }

    /// The full trigger-string set: the canonical name plus every alias.
    #[must_use]
    pub fn trigger_strings(&self) -> BTreeSet<String> {
        let mut strings = self.aliases.clone();
        strings.insert(self.name.clone());
        strings
    }

    /// Every token sequence which can trigger this command.
    ///
    /// For a name `"points add"` with aliases `{"gold", "rewards"}` the
    /// branches are `[points, add]`, `[gold, add]`, `[rewards, add]`:
    /// an alias always stands in for the first word only.
    #[must_use]
    pub fn command_tree(&self) -> Vec<Vec<String>> {
        let words: Vec<&str> = self.name.split(' ').collect();
        let tail = &words[1..];

        let mut firsts: Vec<&str> = Vec::with_capacity(1 + self.aliases.len());
        firsts.push(words[0]);
        firsts.extend(self.aliases.iter().map(String::as_str));

        firsts
            .into_iter()
            .map(|first| {
                let mut branch = Vec::with_capacity(1 + tail.len());
                branch.push(first.to_string());
                branch.extend(tail.iter().map(|w| (*w).to_string()));
                branch
            })
            .collect()
    }

    /// Duplicate predicate: `true` when the trigger-string sets of the two
    /// commands intersect.
    ///
    /// `"points"` and `"points add"` do not conflict (distinct full
    /// names); two commands sharing a name or alias do.
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.trigger_strings()
            .intersection(&other.trigger_strings())
            .next()
            .is_some()
    }

    /// The first trigger string shared with `other`, if any.
    #[must_use]
    pub fn shared_trigger(&self, other: &Self) -> Option<String> {
        self.trigger_strings()
            .intersection(&other.trigger_strings())
            .next()
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_ctx: CommandContext) -> HandlerFuture {
        Box::pin(async { Ok(()) })
    }

    fn native(name: &'static str, aliases: &'static [&'static str]) -> Command {
        Command::from_native(&NativeCommand {
            name,
            aliases,
            description: "",
            level: CommandLevel::All,
            cooldown_secs: 0,
            visible: true,
            handler: noop,
        })
    }

    #[test]
    fn test_command_tree_expands_aliases_over_the_first_word() {
        let command = native("points add", &["gold", "rewards"]);
        let mut tree = command.command_tree();
        tree.sort();

        assert_eq!(
            tree,
            vec![
                vec!["gold".to_string(), "add".to_string()],
                vec!["points".to_string(), "add".to_string()],
                vec!["rewards".to_string(), "add".to_string()],
            ]
        );
    }

    #[test]
    fn test_single_word_tree() {
        let command = native("ping", &[]);
        assert_eq!(command.command_tree(), vec![vec!["ping".to_string()]]);
    }

    #[test]
    fn test_trigger_words_are_first_words_only() {
        let command = native("globalcom add", &["addcom"]);
        let trigger_words = command.trigger_words();
        let words: Vec<&str> = trigger_words.iter().map(String::as_str).collect();
        assert_eq!(words, vec!["addcom", "globalcom"]);
    }

    #[test]
    fn test_subcommands_do_not_conflict() {
        let points = native("points", &[]);
        let points_add = native("points add", &[]);
        assert!(!points.conflicts_with(&points_add));

        let add = native("globalcom add", &[]);
        let del = native("globalcom del", &[]);
        assert!(!add.conflicts_with(&del));
    }

    #[test]
    fn test_shared_name_or_alias_conflicts() {
        let ping = native("ping", &[]);
        let ping2 = native("ping", &["pong"]);
        assert!(ping.conflicts_with(&ping2));
        assert_eq!(ping.shared_trigger(&ping2), Some("ping".to_string()));

        let a = native("first", &["shared"]);
        let b = native("second", &["shared"]);
        assert!(a.conflicts_with(&b));
    }

    #[test]
    fn test_from_record_rejects_malformed_fields() {
        let mut record = CustomCommandRecord::new("hug", "sends a hug", 100);
        assert!(Command::from_record(&record).is_ok());

        record.level = "abc".to_string();
        assert!(Command::from_record(&record).is_err());

        record.level = "100".to_string();
        record.cooldown = Some("soon".to_string());
        assert!(Command::from_record(&record).is_err());
    }

    #[test]
    fn test_from_record_shape() {
        let mut record = CustomCommandRecord::new("HUG", "sends a hug", 100);
        record.aliases = Some("squeeze".to_string());
        let command = Command::from_record(&record).unwrap();

        assert_eq!(command.name(), "hug");
        assert!(command.is_custom());
        assert_eq!(command.level(), CommandLevel::Follower);
        assert!(!command.visible());
        match command.action() {
            Action::Custom { response } => assert_eq!(response, "sends a hug"),
            Action::Native(_) => panic!("expected a custom action"),
        }
    }
}
