//! Resolution of raw chat text against the trigger index.

use crate::command::Command;
use crate::index::CommandIndex;
use std::sync::Arc;

/// A successful resolution: the matched command and whatever text
/// followed the matched trigger.
#[derive(Debug)]
pub struct Resolution {
    /// The matched command.
    pub command: Arc<Command>,
    /// Trimmed text after the matched trigger; `None` when nothing
    /// followed it, which handlers treat differently from an empty
    /// argument.
    pub args: Option<String>,
}

/// Extracts the longest matching trigger from prefixed chat lines.
#[derive(Debug, Clone)]
pub struct CommandResolver {
    prefix: String,
}

impl CommandResolver {
    /// Creates a resolver for the given command prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The configured command prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolves a raw message against the index.
    ///
    /// The message must start with the prefix; the remainder is tokenized
    /// on whitespace and matched case-insensitively against the trigger
    /// branches, longest branch winning. Returns `None` for unprefixed
    /// text and unknown triggers alike.
    #[must_use]
    pub fn resolve(&self, index: &CommandIndex, text: &str) -> Option<Resolution> {
        let rest = text.strip_prefix(&self.prefix)?;
        let tokens: Vec<&str> = rest.split_whitespace().collect();
        let (command, consumed) = index.resolve_tokens(&tokens)?;

        // Walk past the matched tokens in the original text so argument
        // spacing survives intact.
        let mut remaining = rest;
        for token in &tokens[..consumed] {
            remaining = remaining.trim_start();
            remaining = &remaining[token.len()..];
        }
        let args = remaining.trim();
        let args = if args.is_empty() {
            None
        } else {
            Some(args.to_string())
        };

        Some(Resolution { command, args })
    }
}
