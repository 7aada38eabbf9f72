//! Persisted custom-command records and the store abstraction over them.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use warden_common::Result;

/// Errors raised while decoding a persisted custom-command record.
///
/// A record that fails to decode is dropped as a whole; it is never loaded
/// with a permissive default in place of the malformed field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The level field is not the exact weight of any known level.
    #[error("custom command '{name}' has an invalid level weight: {value:?}")]
    InvalidLevel {
        /// Name of the offending record.
        name: String,
        /// The raw level string.
        value: String,
    },

    /// The cooldown field is present but not a non-negative integer.
    #[error("custom command '{name}' has an invalid cooldown: {value:?}")]
    InvalidCooldown {
        /// Name of the offending record.
        name: String,
        /// The raw cooldown string.
        value: String,
    },
}

/// A custom command as stored in the external key-value store.
///
/// All fields are string-encoded; this record shape is the only externally
/// visible schema the engine depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCommandRecord {
    /// Lowercase command name, the primary trigger.
    pub name: String,
    /// Pipe-delimited alias list, absent when the command has no aliases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<String>,
    /// String-encoded weight of the level required to invoke the command.
    pub level: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Response text emitted verbatim when the command is triggered.
    pub response: String,
    /// String-encoded visibility flag; absent reads as hidden.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_command_list: Option<String>,
    /// String-encoded cooldown seconds; absent reads as unthrottled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<String>,
}

impl CustomCommandRecord {
    /// Builds the record persisted when a custom command is added at
    /// runtime: name and response from the caller, an explicit level
    /// weight, no aliases, hidden, unthrottled.
    #[must_use]
    pub fn new(name: &str, response: &str, level_weight: i64) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            aliases: None,
            level: level_weight.to_string(),
            description: None,
            response: response.to_string(),
            show_in_command_list: None,
            cooldown: None,
        }
    }

    /// Aliases as a lowercase list; an absent or empty field is no aliases.
    #[must_use]
    pub fn alias_list(&self) -> Vec<String> {
        self.aliases
            .as_deref()
            .unwrap_or_default()
            .split('|')
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect()
    }

    /// Decodes the level field; the weight must match a level exactly.
    pub fn parsed_level(&self) -> std::result::Result<crate::level::CommandLevel, RecordError> {
        self.level
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(crate::level::CommandLevel::from_weight)
            .ok_or_else(|| RecordError::InvalidLevel {
                name: self.name.clone(),
                value: self.level.clone(),
            })
    }

    /// Decodes the cooldown field; absent means unthrottled.
    pub fn parsed_cooldown(&self) -> std::result::Result<u64, RecordError> {
        match self.cooldown.as_deref() {
            None => Ok(0),
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                RecordError::InvalidCooldown {
                    name: self.name.clone(),
                    value: raw.to_string(),
                }
            }),
        }
    }

    /// Decodes the visibility flag; anything but `"true"` reads as hidden.
    #[must_use]
    pub fn parsed_visibility(&self) -> bool {
        self.show_in_command_list
            .as_deref()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }
}

/// External store holding the persisted custom-command set.
///
/// Implementations own durability; the engine treats the store as the
/// source of truth at startup and writes through on mutation.
#[async_trait]
pub trait CustomCommandStore: Send + Sync {
    /// Loads every persisted record.
    async fn list_all(&self) -> Result<Vec<CustomCommandRecord>>;

    /// Inserts or replaces the record keyed by its lowercase name.
    async fn upsert(&self, record: &CustomCommandRecord) -> Result<()>;

    /// Deletes the record with the given lowercase name, if present.
    async fn delete(&self, name: &str) -> Result<()>;

    /// Returns `true` if a record with the given lowercase name exists.
    async fn exists(&self, name: &str) -> Result<bool>;
}

/// In-memory store for tests and ephemeral runs.
///
/// Records come back from [`CustomCommandStore::list_all`] sorted by name,
/// which makes the index merge deterministic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, CustomCommandRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with the given records.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = CustomCommandRecord>) -> Self {
        let store = Self::new();
        {
            let mut map = store.records.lock();
            for record in records {
                map.insert(record.name.clone(), record);
            }
        }
        store
    }
}

#[async_trait]
impl CustomCommandStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<CustomCommandRecord>> {
        Ok(self.records.lock().values().cloned().collect())
    }

    async fn upsert(&self, record: &CustomCommandRecord) -> Result<()> {
        self.records
            .lock()
            .insert(record.name.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.records.lock().remove(name);
        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.records.lock().contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::CommandLevel;

    #[test]
    fn test_alias_list_parsing() {
        let mut record = CustomCommandRecord::new("hug", "sends a hug", 100);
        assert!(record.alias_list().is_empty());

        record.aliases = Some("Squeeze|CUDDLE|".to_string());
        assert_eq!(record.alias_list(), vec!["squeeze", "cuddle"]);
    }

    #[test]
    fn test_level_decoding_is_strict() {
        let mut record = CustomCommandRecord::new("hug", "sends a hug", 100);
        assert_eq!(record.parsed_level(), Ok(CommandLevel::Follower));

        record.level = "abc".to_string();
        assert!(matches!(
            record.parsed_level(),
            Err(RecordError::InvalidLevel { .. })
        ));

        // Numeric but matching no level exactly is just as malformed.
        record.level = "150".to_string();
        assert!(record.parsed_level().is_err());
    }

    #[test]
    fn test_cooldown_decoding() {
        let mut record = CustomCommandRecord::new("hug", "sends a hug", 100);
        assert_eq!(record.parsed_cooldown(), Ok(0));

        record.cooldown = Some("20".to_string());
        assert_eq!(record.parsed_cooldown(), Ok(20));

        record.cooldown = Some("-5".to_string());
        assert!(record.parsed_cooldown().is_err());
    }

    #[test]
    fn test_visibility_decoding() {
        let mut record = CustomCommandRecord::new("hug", "sends a hug", 100);
        assert!(!record.parsed_visibility());

        record.show_in_command_list = Some("true".to_string());
        assert!(record.parsed_visibility());

        record.show_in_command_list = Some("yes".to_string());
        assert!(!record.parsed_visibility());
    }

    #[test]
    fn test_memory_store_round_trip() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let record = CustomCommandRecord::new("hug", "sends a hug", i64::MIN);

            store.upsert(&record).await.unwrap();
            assert!(store.exists("hug").await.unwrap());
            assert_eq!(store.list_all().await.unwrap(), vec![record]);

            store.delete("hug").await.unwrap();
            assert!(!store.exists("hug").await.unwrap());
            assert!(store.list_all().await.unwrap().is_empty());
        });
    }
}
