use gpatrack_core::{
    CandidateRow, FakeClock, GpaTracker, GradeScale, KeyValueStore, SqliteKeyValueStore,
    StoreError, StoreResult, ThemePreference, TrackerConfig, TrackerError, ALL_COURSES_KEY,
    DEFAULT_UNDO_WINDOW,
};
use std::cell::Cell;
use std::path::Path;

/// Store wrapper whose writes can be switched off.
struct FlakyStore {
    inner: SqliteKeyValueStore,
    fail_writes: Cell<bool>,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(key)
    }
}

fn open_file_tracker(path: &Path) -> GpaTracker<SqliteKeyValueStore> {
    let config = TrackerConfig {
        db_path: path.to_path_buf(),
        ..TrackerConfig::default()
    };
    GpaTracker::open(SqliteKeyValueStore::open(&config.db_path).unwrap(), &config).unwrap()
}

fn stored_course_count(store: &impl KeyValueStore) -> usize {
    let raw = store.get(ALL_COURSES_KEY).unwrap().unwrap_or_default();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    value.as_array().map_or(0, Vec::len)
}

#[test]
fn ledger_and_theme_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gpatrack.db");

    {
        let mut tracker = open_file_tracker(&path);
        tracker
            .submit_batch(&[
                CandidateRow::new("Calc I", "A", "4"),
                CandidateRow::new("Phys I", "B", "3"),
            ])
            .unwrap();
        assert_eq!(tracker.toggle_theme().unwrap(), ThemePreference::Dark);
    }

    let tracker = open_file_tracker(&path);
    assert_eq!(tracker.ledger().len(), 2);
    assert_eq!(tracker.ledger()[1].name, "Phys I");
    assert_eq!(tracker.theme(), ThemePreference::Dark);
    assert_eq!(tracker.aggregation().gpa_display(), "3.57");
}

#[test]
fn delete_is_persisted_immediately_and_undo_persists_again() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gpatrack.db");
    let mut tracker = open_file_tracker(&path);
    tracker
        .submit_batch(&[
            CandidateRow::new("Calc I", "A", "4"),
            CandidateRow::new("Phys I", "B", "3"),
        ])
        .unwrap();

    tracker.delete_at(0).unwrap();
    assert_eq!(stored_course_count(tracker.store()), 1);

    assert!(tracker.undo().unwrap());
    assert_eq!(stored_course_count(tracker.store()), 2);

    drop(tracker);
    let reopened = open_file_tracker(&path);
    assert_eq!(reopened.ledger()[0].name, "Calc I");
}

#[test]
fn persistence_failure_keeps_memory_state_until_retry() {
    let store = FlakyStore {
        inner: SqliteKeyValueStore::open_in_memory().unwrap(),
        fail_writes: Cell::new(false),
    };
    let mut tracker = GpaTracker::open_with_clock(
        store,
        GradeScale::Campus,
        DEFAULT_UNDO_WINDOW,
        FakeClock::new(),
    )
    .unwrap();

    tracker.store().fail_writes.set(true);
    let err = tracker
        .submit_batch(&[CandidateRow::new("Calc I", "A", "4")])
        .unwrap_err();
    assert!(matches!(err, TrackerError::Persistence(StoreError::Unavailable(_))));
    assert_eq!(tracker.ledger().len(), 1);
    assert!(tracker.is_dirty());
    assert_eq!(tracker.store().get(ALL_COURSES_KEY).unwrap(), None);

    assert!(tracker.retry_persist().is_err());
    assert!(tracker.is_dirty());

    tracker.store().fail_writes.set(false);
    tracker.retry_persist().unwrap();
    assert!(!tracker.is_dirty());
    assert_eq!(stored_course_count(tracker.store()), 1);
}

#[test]
fn failed_delete_and_undo_writes_stay_dirty_until_retry() {
    let store = FlakyStore {
        inner: SqliteKeyValueStore::open_in_memory().unwrap(),
        fail_writes: Cell::new(false),
    };
    let mut tracker = GpaTracker::open_with_clock(
        store,
        GradeScale::Campus,
        DEFAULT_UNDO_WINDOW,
        FakeClock::new(),
    )
    .unwrap();
    tracker
        .submit_batch(&[
            CandidateRow::new("Calc I", "A", "4"),
            CandidateRow::new("Phys I", "B", "3"),
        ])
        .unwrap();

    tracker.store().fail_writes.set(true);
    let err = tracker.delete_at(0).unwrap_err();
    assert!(matches!(err, TrackerError::Persistence(StoreError::Unavailable(_))));
    assert_eq!(tracker.ledger().len(), 1);
    assert_eq!(tracker.ledger()[0].name, "Phys I");
    assert!(tracker.is_dirty());
    assert!(tracker.undo_available());
    assert_eq!(stored_course_count(tracker.store()), 2);

    tracker.store().fail_writes.set(false);
    tracker.retry_persist().unwrap();
    assert!(!tracker.is_dirty());
    assert_eq!(stored_course_count(tracker.store()), 1);

    tracker.store().fail_writes.set(true);
    let err = tracker.undo().unwrap_err();
    assert!(matches!(err, TrackerError::Persistence(_)));
    assert_eq!(tracker.ledger().len(), 2);
    assert_eq!(tracker.ledger()[0].name, "Calc I");
    assert!(tracker.is_dirty());
    assert!(!tracker.undo_available());

    tracker.store().fail_writes.set(false);
    tracker.retry_persist().unwrap();
    assert!(!tracker.is_dirty());
    assert_eq!(stored_course_count(tracker.store()), 2);
}

#[test]
fn theme_failure_is_retried_separately() {
    let store = FlakyStore {
        inner: SqliteKeyValueStore::open_in_memory().unwrap(),
        fail_writes: Cell::new(true),
    };
    let mut tracker = GpaTracker::open_with_clock(
        store,
        GradeScale::Campus,
        DEFAULT_UNDO_WINDOW,
        FakeClock::new(),
    )
    .unwrap();

    assert!(tracker.set_theme(ThemePreference::Dark).is_err());
    assert_eq!(tracker.theme(), ThemePreference::Dark);
    assert!(tracker.is_dirty());

    tracker.store().fail_writes.set(false);
    tracker.retry_persist().unwrap();
    assert_eq!(
        tracker.store().get("theme").unwrap().as_deref(),
        Some("dark")
    );
}

#[test]
fn corrupt_ledger_snapshot_fails_open() {
    let kv = SqliteKeyValueStore::open_in_memory().unwrap();
    kv.set(ALL_COURSES_KEY, "[{\"name\":\"x\"}]").unwrap();

    let result = GpaTracker::open(kv, &TrackerConfig::default());
    assert!(matches!(result, Err(TrackerError::Persistence(_))));
}
