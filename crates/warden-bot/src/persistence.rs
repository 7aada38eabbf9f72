//! JSON-file store for custom commands and the channel roster.
//!
//! A single document on disk holds both persisted data sets, keyed by
//! lowercase name so startup merges are deterministic. Writes go through
//! a tempfile-and-rename so a crash mid-write never corrupts the file.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use warden_commands::{CustomCommandRecord, CustomCommandStore};
use warden_common::{Result, WardenError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct DataFile {
    /// Custom-command records keyed by lowercase command name.
    #[serde(default)]
    custom_commands: BTreeMap<String, CustomCommandRecord>,
    /// Channels the bot rejoins after a restart.
    #[serde(default)]
    channels: BTreeSet<String>,
}

/// File-backed implementation of [`CustomCommandStore`] plus the
/// permanent channel roster.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: Mutex<DataFile>,
}

impl JsonFileStore {
    /// Opens the store, reading any existing data file.
    ///
    /// An unreadable or malformed file is reported and treated as empty;
    /// persisted data must never keep the bot from starting.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(data) => data,
                Err(e) => {
                    warn!("data file {} is malformed, starting empty: {e}", path.display());
                    DataFile::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("data file {} does not exist yet", path.display());
                DataFile::default()
            }
            Err(e) => {
                warn!("cannot read data file {}, starting empty: {e}", path.display());
                DataFile::default()
            }
        };
        Self {
            path,
            data: Mutex::new(data),
        }
    }

    /// The channels marked for rejoining after a restart.
    #[must_use]
    pub fn channels(&self) -> BTreeSet<String> {
        self.data.lock().channels.clone()
    }

    /// Adds a channel to the permanent roster.
    pub fn add_channel(&self, channel: &str) -> Result<()> {
        let mut data = self.data.lock();
        data.channels.insert(channel.trim().to_lowercase());
        self.flush(&data)
    }

    /// Removes a channel from the permanent roster.
    pub fn remove_channel(&self, channel: &str) -> Result<()> {
        let mut data = self.data.lock();
        data.channels.remove(&channel.trim().to_lowercase());
        self.flush(&data)
    }

    fn flush(&self, data: &DataFile) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let tmp = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| WardenError::store_with_source("cannot create temp data file", e))?;
        serde_json::to_writer_pretty(tmp.as_file(), data)?;
        tmp.persist(&self.path)
            .map_err(|e| WardenError::store_with_source("cannot replace data file", e))?;
        Ok(())
    }
}

#[async_trait]
impl CustomCommandStore for JsonFileStore {
    async fn list_all(&self) -> Result<Vec<CustomCommandRecord>> {
        Ok(self.data.lock().custom_commands.values().cloned().collect())
    }

    async fn upsert(&self, record: &CustomCommandRecord) -> Result<()> {
        let mut data = self.data.lock();
        data.custom_commands
            .insert(record.name.clone(), record.clone());
        self.flush(&data)
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let mut data = self.data.lock();
        if data.custom_commands.remove(name).is_some() {
            self.flush(&data)?;
        }
        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.data.lock().custom_commands.contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> CustomCommandRecord {
        CustomCommandRecord::new(name, "response text", i64::MIN)
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("warden-data.json"));
        assert!(store.channels().is_empty());
    }

    #[test]
    fn test_records_survive_a_reopen() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("warden-data.json");

            let store = JsonFileStore::open(&path);
            store.upsert(&record("hug")).await.unwrap();
            store.add_channel("SepGG").unwrap();

            let reopened = JsonFileStore::open(&path);
            assert!(reopened.exists("hug").await.unwrap());
            assert_eq!(reopened.list_all().await.unwrap(), vec![record("hug")]);
            assert_eq!(
                reopened.channels().into_iter().collect::<Vec<_>>(),
                vec!["sepgg"]
            );
        });
    }

    #[test]
    fn test_delete_removes_the_record() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("warden-data.json");

            let store = JsonFileStore::open(&path);
            store.upsert(&record("hug")).await.unwrap();
            store.delete("hug").await.unwrap();
            // Deleting an absent record is a quiet no-op.
            store.delete("hug").await.unwrap();

            let reopened = JsonFileStore::open(&path);
            assert!(!reopened.exists("hug").await.unwrap());
        });
    }

    #[test]
    fn test_malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warden-data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert!(store.channels().is_empty());
    }
}
