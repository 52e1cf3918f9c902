use periop_storage::sqlite::DATABASE_FILE;
use periop_storage::state::{load_state, try_load_state};
use periop_storage::{Batch, SqliteStore, StorageError, Store};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Note {
    text: String,
}

fn note(text: &str) -> Note {
    Note {
        text: text.to_string(),
    }
}

fn exercise_store(store: &dyn Store) {
    assert!(matches!(
        store.get("patients/missing.json"),
        Err(StorageError::NotFound { .. })
    ));

    let mut batch = Batch::new();
    batch
        .put_json("records/a/scales/caprini.json", &note("caprini"))
        .unwrap()
        .put_json("records/a/scales/_status.json", &note("status"))
        .unwrap()
        .put_json("records/b/scales/_status.json", &note("other"))
        .unwrap();
    store.commit(batch).unwrap();

    let loaded: Note = load_state(store, "records/a/scales/caprini.json").unwrap();
    assert_eq!(loaded, note("caprini"));
    assert_eq!(
        store.list("records/a/").unwrap(),
        vec![
            "records/a/scales/_status.json".to_string(),
            "records/a/scales/caprini.json".to_string(),
        ]
    );
    assert_eq!(store.list("records/").unwrap().len(), 3);

    let mut batch = Batch::new();
    batch
        .delete("records/a/scales/caprini.json")
        .unwrap()
        .delete("records/a/scales/never-written.json")
        .unwrap()
        .put_json("records/a/scales/_status.json", &note("updated"))
        .unwrap();
    store.commit(batch).unwrap();

    assert!(!store.exists("records/a/scales/caprini.json").unwrap());
    let missing: Option<Note> = try_load_state(store, "records/a/scales/caprini.json").unwrap();
    assert_eq!(missing, None);
    let status: Note = load_state(store, "records/a/scales/_status.json").unwrap();
    assert_eq!(status, note("updated"));
}

#[test]
fn in_memory_store_round_trip() {
    exercise_store(&SqliteStore::open_in_memory().unwrap());
}

#[test]
fn file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open_dir(dir.path()).unwrap();
    exercise_store(&store);
    assert!(dir.path().join(DATABASE_FILE).exists());
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = SqliteStore::open_dir(dir.path()).unwrap();
        let mut batch = Batch::new();
        batch.put_json("patients/p1.json", &note("kept")).unwrap();
        store.commit(batch).unwrap();
    }
    let store = SqliteStore::open_dir(dir.path()).unwrap();
    let kept: Note = load_state(&store, "patients/p1.json").unwrap();
    assert_eq!(kept, note("kept"));
}

#[cfg(unix)]
#[test]
fn database_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    SqliteStore::open_dir(dir.path()).unwrap();
    let mode = std::fs::metadata(dir.path().join(DATABASE_FILE))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

fn seed_status(store: &SqliteStore) {
    let mut batch = Batch::new();
    batch
        .put_json("records/x/scales/_status.json", &note("not filled"))
        .unwrap();
    store.commit(batch).unwrap();
}

/// A result, its refreshed status, then an op that cannot be stored.
fn failing_batch() -> Batch {
    let mut batch = Batch::new();
    batch
        .put_json("records/x/scales/caprini.json", &note("result"))
        .unwrap()
        .put_json("records/x/scales/_status.json", &note("filled"))
        .unwrap()
        .put("records/x/scales/broken.json", b"not json".to_vec())
        .unwrap();
    batch
}

fn assert_untouched(store: &SqliteStore) {
    assert!(!store.exists("records/x/scales/caprini.json").unwrap());
    assert!(!store.exists("records/x/scales/broken.json").unwrap());
    let status: Note = load_state(store, "records/x/scales/_status.json").unwrap();
    assert_eq!(status, note("not filled"));
    assert_eq!(store.list("records/x/").unwrap().len(), 1);
}

#[test]
fn failed_commit_leaves_no_partial_batch() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = SqliteStore::open_dir(dir.path()).unwrap();
        seed_status(&store);

        let err = store.commit(failing_batch()).unwrap_err();
        assert!(matches!(err, StorageError::Database(_)), "{err:?}");
        assert_untouched(&store);

        // The store stays usable and the failed ops do not resurface.
        let mut batch = Batch::new();
        batch.put_json("records/x/slices/t0.json", &note("slice")).unwrap();
        store.commit(batch).unwrap();
        assert!(!store.exists("records/x/scales/caprini.json").unwrap());
    }

    let store = SqliteStore::open_dir(dir.path()).unwrap();
    assert!(!store.exists("records/x/scales/caprini.json").unwrap());
    let status: Note = load_state(&store, "records/x/scales/_status.json").unwrap();
    assert_eq!(status, note("not filled"));
    assert!(store.exists("records/x/slices/t0.json").unwrap());
}

#[test]
fn invalid_key_midway_rolls_back() {
    let store = SqliteStore::open_in_memory().unwrap();
    seed_status(&store);

    // Batches are deserializable, so keys are checked again at commit.
    let batch: Batch = serde_json::from_value(serde_json::json!({
        "ops": [
            { "op": "delete", "key": "records/x/scales/_status.json" },
            { "op": "delete", "key": "../outside.json" },
        ]
    }))
    .unwrap();
    assert!(matches!(
        store.commit(batch),
        Err(StorageError::InvalidKey { .. })
    ));
    assert!(store.exists("records/x/scales/_status.json").unwrap());
}

#[test]
fn non_utf8_body_is_rejected() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut batch = Batch::new();
    batch
        .put_json("patients/p1.json", &note("first"))
        .unwrap()
        .put("patients/p2.json", vec![0xff, 0xfe])
        .unwrap();
    assert!(matches!(
        store.commit(batch),
        Err(StorageError::InvalidBody { .. })
    ));
    assert!(store.list("patients/").unwrap().is_empty());
}

#[test]
fn keys_must_be_relative_and_clean() {
    let mut batch = Batch::new();
    assert!(matches!(
        batch.put("../escape.json", Vec::new()),
        Err(StorageError::InvalidKey { .. })
    ));
    assert!(batch.put("/abs.json", Vec::new()).is_err());
    assert!(batch.delete("records//double.json").is_err());
    assert!(batch.is_empty());

    let store = SqliteStore::open_in_memory().unwrap();
    assert!(matches!(
        store.get("a/../b"),
        Err(StorageError::InvalidKey { .. })
    ));
}
