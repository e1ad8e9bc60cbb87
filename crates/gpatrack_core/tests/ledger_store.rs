use gpatrack_core::{
    CourseRecord, Grade, GradeScale, KeyValueStore, LedgerStore, SqliteKeyValueStore, StoreError,
    ThemePreference, ALL_COURSES_KEY, THEME_KEY,
};

fn course(name: &str, grade: Grade, credit: f64) -> CourseRecord {
    CourseRecord::new(name, grade, credit, GradeScale::Campus).unwrap()
}

#[test]
fn empty_store_loads_empty_ledger_and_no_theme() {
    let store = LedgerStore::new(SqliteKeyValueStore::open_in_memory().unwrap());

    assert!(store.load_courses().unwrap().is_empty());
    assert_eq!(store.load_theme().unwrap(), None);
}

#[test]
fn save_and_load_courses_preserves_order() {
    let store = LedgerStore::new(SqliteKeyValueStore::open_in_memory().unwrap());
    let courses = vec![
        course("Phys I", Grade::B, 3.0),
        course("Calc I", Grade::A, 4.0),
        course("Art", Grade::CPlus, 1.5),
    ];

    store.save_courses(&courses).unwrap();
    assert_eq!(store.load_courses().unwrap(), courses);
}

#[test]
fn courses_are_stored_as_one_json_array_under_all_courses_key() {
    let store = LedgerStore::new(SqliteKeyValueStore::open_in_memory().unwrap());
    store
        .save_courses(&[course("Calc I", Grade::A, 4.0)])
        .unwrap();

    let raw = store.inner().get(ALL_COURSES_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!([
            { "name": "Calc I", "grade": "A", "gradePoint": 4.0, "credit": 4.0 }
        ])
    );
}

#[test]
fn stored_null_reads_as_empty_ledger() {
    let kv = SqliteKeyValueStore::open_in_memory().unwrap();
    kv.set(ALL_COURSES_KEY, "null").unwrap();

    let store = LedgerStore::new(kv);
    assert!(store.load_courses().unwrap().is_empty());
}

#[test]
fn corrupt_snapshot_is_rejected() {
    let kv = SqliteKeyValueStore::open_in_memory().unwrap();
    kv.set(ALL_COURSES_KEY, "{not json").unwrap();

    let store = LedgerStore::new(kv);
    let err = store.load_courses().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(ref message) if message.contains(ALL_COURSES_KEY)));
}

#[test]
fn theme_is_stored_as_bare_label() {
    let store = LedgerStore::new(SqliteKeyValueStore::open_in_memory().unwrap());
    store.save_theme(ThemePreference::Dark).unwrap();

    assert_eq!(store.inner().get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    assert_eq!(store.load_theme().unwrap(), Some(ThemePreference::Dark));
}

#[test]
fn unknown_theme_value_reads_as_unset() {
    let kv = SqliteKeyValueStore::open_in_memory().unwrap();
    kv.set(THEME_KEY, "sepia").unwrap();

    let store = LedgerStore::new(kv);
    assert_eq!(store.load_theme().unwrap(), None);
}
