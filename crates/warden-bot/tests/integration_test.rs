//! Integration tests for warden-bot: the engine running over the real
//! file-backed store.

use std::sync::Arc;
use warden_bot::persistence::JsonFileStore;
use warden_commands::{
    native_commands, CommandIndex, CommandLevel, CustomCommandRecord, CustomCommandStore,
};

fn store_at(path: &std::path::Path) -> Arc<JsonFileStore> {
    Arc::new(JsonFileStore::open(path))
}

#[tokio::test]
async fn test_custom_commands_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warden-data.json");

    // First run: add a custom command through the index.
    {
        let store = store_at(&path);
        let index = CommandIndex::build(
            native_commands(),
            Arc::clone(&store) as Arc<dyn CustomCommandStore>,
        )
        .await
        .unwrap();
        index
            .add_custom("hug", None, "squeezes chat", CommandLevel::All)
            .await
            .unwrap();
    }

    // Second run: the rebuilt index resolves it again.
    let store = store_at(&path);
    let index = CommandIndex::build(
        native_commands(),
        Arc::clone(&store) as Arc<dyn CustomCommandStore>,
    )
    .await
    .unwrap();

    let (command, _) = index.resolve_tokens(&["hug"]).unwrap();
    assert!(command.is_custom());
    assert_eq!(command.level(), CommandLevel::All);
}

#[tokio::test]
async fn test_stale_colliding_record_is_dropped_but_kept_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warden-data.json");

    // A record shadowing a built-in somehow ended up persisted.
    {
        let store = store_at(&path);
        store
            .upsert(&CustomCommandRecord::new("ping", "fake pong", i64::MIN))
            .await
            .unwrap();
    }

    let store = store_at(&path);
    let index = CommandIndex::build(
        native_commands(),
        Arc::clone(&store) as Arc<dyn CustomCommandStore>,
    )
    .await
    .unwrap();

    // The built-in wins; the stale record is not loaded.
    let (command, _) = index.resolve_tokens(&["ping"]).unwrap();
    assert!(!command.is_custom());
    assert!(store.exists("ping").await.unwrap());

    // An explicit remove cleans the stale record without touching the
    // built-in.
    assert!(!index.remove_custom("ping").await.unwrap());
    assert!(!store.exists("ping").await.unwrap());
    assert!(index.resolve_tokens(&["ping"]).is_some());
}

#[tokio::test]
async fn test_channel_roster_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warden-data.json");

    {
        let store = store_at(&path);
        store.add_channel("friend_channel").unwrap();
        store.add_channel("other_channel").unwrap();
        store.remove_channel("other_channel").unwrap();
    }

    let store = store_at(&path);
    assert_eq!(
        store.channels().into_iter().collect::<Vec<_>>(),
        vec!["friend_channel"]
    );
}
