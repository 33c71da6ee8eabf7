use rollcall_core::db::open_db_in_memory;
use rollcall_core::{KeyValueStore, SqliteKvStore};

#[test]
fn sqlite_get_returns_none_for_missing_key() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);
    assert_eq!(store.get("classRosters").unwrap(), None);
}

#[test]
fn sqlite_set_overwrites_existing_value() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);

    store.set("currentRoster", "Default").unwrap();
    store.set("currentRoster", "Period 2").unwrap();

    assert_eq!(
        store.get("currentRoster").unwrap().as_deref(),
        Some("Period 2")
    );
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn sqlite_set_many_writes_all_entries() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);

    store
        .set_many(&[("classRosters", "[]"), ("currentRoster", "Default")])
        .unwrap();

    assert_eq!(store.get("classRosters").unwrap().as_deref(), Some("[]"));
    assert_eq!(
        store.get("currentRoster").unwrap().as_deref(),
        Some("Default")
    );
}

#[test]
fn sqlite_set_many_is_atomic_on_failure() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);
    store.set("currentRoster", "Default").unwrap();

    conn.execute_batch(
        "CREATE TRIGGER reject_poison BEFORE INSERT ON kv_entries
         WHEN NEW.key = 'poison'
         BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
    )
    .unwrap();

    let result = store.set_many(&[("currentRoster", "Period 2"), ("poison", "x")]);
    assert!(result.is_err());
    assert_eq!(
        store.get("currentRoster").unwrap().as_deref(),
        Some("Default")
    );
}
