//! The live trigger index: built once at startup, mutable at runtime.

use crate::command::Command;
use crate::level::CommandLevel;
use crate::registry::NativeCommand;
use crate::store::{CustomCommandRecord, CustomCommandStore};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use warden_common::{Result, WardenError};

/// Fatal build error: two built-in commands claim the same trigger.
///
/// The caller must treat this as a startup abort; the bot never goes live
/// with an ambiguous built-in set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("command trigger '{trigger}' is assigned to both '{existing}' and '{duplicate}'")]
pub struct DuplicateCommandError {
    /// The contested trigger string.
    pub trigger: String,
    /// Name of the command registered first.
    pub existing: String,
    /// Name of the command that tried to register the trigger again.
    pub duplicate: String,
}

/// One registered trigger branch and the command owning it.
#[derive(Debug)]
struct IndexEntry {
    branch: Vec<String>,
    command: Arc<Command>,
}

/// Mapping from first trigger token to the commands reachable through it,
/// refined by the remaining branch tokens at resolution time.
///
/// Reads (resolution) and writes (startup build, runtime add/remove) are
/// synchronized by a single reader-writer lock; contention is expected to
/// be rare since administrative mutations are infrequent.
pub struct CommandIndex {
    triggers: RwLock<HashMap<String, Vec<IndexEntry>>>,
    store: Arc<dyn CustomCommandStore>,
}

impl std::fmt::Debug for CommandIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandIndex")
            .field("triggers", &self.triggers)
            .finish_non_exhaustive()
    }
}

impl CommandIndex {
    /// Builds the merged index from the native command table and the
    /// persisted custom-command set.
    ///
    /// Build order is load-bearing: built-ins are validated pairwise
    /// first (any duplicate is fatal), then persisted customs are merged
    /// in, dropping any record that collides with a built-in or with an
    /// earlier custom. Built-ins always win; among customs the first
    /// registered wins.
    pub async fn build(
        natives: Vec<NativeCommand>,
        store: Arc<dyn CustomCommandStore>,
    ) -> std::result::Result<Self, DuplicateCommandError> {
        let mut built_ins: Vec<Arc<Command>> = Vec::with_capacity(natives.len());
        for decl in &natives {
            let command = Arc::new(Command::from_native(decl));
            for existing in &built_ins {
                if let Some(trigger) = existing.shared_trigger(&command) {
                    return Err(DuplicateCommandError {
                        trigger,
                        existing: existing.name().to_string(),
                        duplicate: command.name().to_string(),
                    });
                }
            }
            built_ins.push(command);
        }

        let mut triggers = HashMap::new();
        for command in &built_ins {
            Self::register_locked(&mut triggers, command);
        }

        // Stale or unreadable persisted data must not keep the bot down.
        let records = match store.list_all().await {
            Ok(records) => records,
            Err(e) => {
                warn!("failed to load custom commands, continuing without them: {e}");
                Vec::new()
            }
        };

        let mut customs: Vec<Arc<Command>> = Vec::new();
        'records: for record in &records {
            let command = match Command::from_record(record) {
                Ok(command) => Arc::new(command),
                Err(e) => {
                    warn!("{e}; it will not be loaded");
                    continue;
                }
            };
            for built_in in &built_ins {
                if built_in.conflicts_with(&command) {
                    error!(
                        "custom command '{}' conflicts with built-in command '{}'; it will not be loaded",
                        command.name(),
                        built_in.name()
                    );
                    continue 'records;
                }
            }
            for earlier in &customs {
                if earlier.conflicts_with(&command) {
                    warn!(
                        "custom command '{}' conflicts with already-loaded custom command '{}'; it will not be loaded",
                        command.name(),
                        earlier.name()
                    );
                    continue 'records;
                }
            }
            Self::register_locked(&mut triggers, &command);
            customs.push(command);
        }

        info!(
            "command index built: {} built-in, {} custom",
            built_ins.len(),
            customs.len()
        );
        Ok(Self {
            triggers: RwLock::new(triggers),
            store,
        })
    }

    /// Finds the command whose trigger branch is the longest prefix of
    /// `tokens`, matching case-insensitively. Returns the command and the
    /// number of tokens the branch consumed.
    pub fn resolve_tokens(&self, tokens: &[&str]) -> Option<(Arc<Command>, usize)> {
        let first = tokens.first()?.to_lowercase();
        let triggers = self.triggers.read();
        let bucket = triggers.get(&first)?;

        let mut best: Option<(usize, &IndexEntry)> = None;
        for entry in bucket {
            let len = entry.branch.len();
            if len > tokens.len() {
                continue;
            }
            let is_prefix = entry
                .branch
                .iter()
                .zip(tokens)
                .all(|(branch_word, token)| branch_word.eq_ignore_ascii_case(token));
            if is_prefix && best.map_or(true, |(best_len, _)| len > best_len) {
                best = Some((len, entry));
            }
        }
        best.map(|(len, entry)| (Arc::clone(&entry.command), len))
    }

    /// Adds a custom command, writing through to the store and registering
    /// it into the live index.
    ///
    /// Re-adding an existing custom name silently overwrites it; callers
    /// wanting add-only semantics must pre-check with
    /// [`Self::contains_trigger`].
    pub async fn add_custom(
        &self,
        name: &str,
        aliases: Option<&str>,
        response: &str,
        level: CommandLevel,
    ) -> Result<Arc<Command>> {
        let mut record = CustomCommandRecord::new(name, response, level.weight());
        record.aliases = aliases
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty());

        self.store.upsert(&record).await?;

        let command = Command::from_record(&record)
            .map_err(|e| WardenError::store(format!("rejected custom command: {e}")))?;
        let command = Arc::new(command);

        let mut triggers = self.triggers.write();
        Self::unregister_custom_named_locked(&mut triggers, command.name());
        Self::register_locked(&mut triggers, &command);
        info!("registered custom command '{}'", command.name());
        Ok(command)
    }

    /// Removes a custom command by its name or one of its aliases: deletes
    /// the persisted record and unregisters every trigger branch it owned.
    ///
    /// Returns `false` (after cleaning up any stale persisted record) when
    /// no custom command owns the trigger. Built-in commands are never
    /// removed through this path.
    pub async fn remove_custom(&self, name: &str) -> Result<bool> {
        let clean = name.trim().to_lowercase();

        let owner = {
            let triggers = self.triggers.read();
            triggers.get(&clean).and_then(|bucket| {
                bucket
                    .iter()
                    .find(|entry| entry.command.is_custom())
                    .map(|entry| Arc::clone(&entry.command))
            })
        };

        let Some(command) = owner else {
            // A record may exist without being indexed (e.g. it collided
            // with a built-in at load time); clean it up regardless.
            self.store.delete(&clean).await?;
            return Ok(false);
        };

        self.store.delete(command.name()).await?;

        let mut triggers = self.triggers.write();
        Self::unregister_locked(&mut triggers, &command);
        info!("removed custom command '{}'", command.name());
        Ok(true)
    }

    /// Returns `true` if any command (or, with `custom_only`, any custom
    /// command) owns the given first-word trigger.
    pub fn contains_trigger(&self, word: &str, custom_only: bool) -> bool {
        let clean = word.trim().to_lowercase();
        let triggers = self.triggers.read();
        triggers.get(&clean).is_some_and(|bucket| {
            bucket
                .iter()
                .any(|entry| !custom_only || entry.command.is_custom())
        })
    }

    /// Names of the visible commands a caller with the given weight may
    /// run, sorted.
    pub fn listable_commands(&self, caller_weight: i64) -> Vec<String> {
        let triggers = self.triggers.read();
        let names: BTreeSet<String> = triggers
            .values()
            .flatten()
            .filter(|entry| entry.command.visible() && entry.command.level().allows(caller_weight))
            .map(|entry| entry.command.name().to_string())
            .collect();
        names.into_iter().collect()
    }

    /// Every registered trigger branch, sorted. Intended for diagnostics
    /// and tests.
    pub fn registered_branches(&self) -> Vec<Vec<String>> {
        let triggers = self.triggers.read();
        let mut branches: Vec<Vec<String>> = triggers
            .values()
            .flatten()
            .map(|entry| entry.branch.clone())
            .collect();
        branches.sort();
        branches
    }

    fn register_locked(triggers: &mut HashMap<String, Vec<IndexEntry>>, command: &Arc<Command>) {
        for branch in command.command_tree() {
            let bucket = triggers.entry(branch[0].clone()).or_default();
            bucket.push(IndexEntry {
                branch,
                command: Arc::clone(command),
            });
        }
    }

    fn unregister_locked(triggers: &mut HashMap<String, Vec<IndexEntry>>, command: &Arc<Command>) {
        for branch in command.command_tree() {
            if let Some(bucket) = triggers.get_mut(&branch[0]) {
                bucket.retain(|entry| !Arc::ptr_eq(&entry.command, command));
            }
        }
        triggers.retain(|_, bucket| !bucket.is_empty());
    }

    fn unregister_custom_named_locked(
        triggers: &mut HashMap<String, Vec<IndexEntry>>,
        name: &str,
    ) {
        for bucket in triggers.values_mut() {
            bucket.retain(|entry| !(entry.command.is_custom() && entry.command.name() == name));
        }
        triggers.retain(|_, bucket| !bucket.is_empty());
    }
}
