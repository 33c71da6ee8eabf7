use rollcall_core::db::migrations::{apply_migrations, latest_version, MigrationOutcome};
use rollcall_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

fn user_version(conn: &Connection) -> u32 {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap()
}

fn kv_table_count(conn: &Connection) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries';",
        [],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn fresh_memory_database_has_kv_table() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(user_version(&conn), latest_version());
    assert_eq!(kv_table_count(&conn), 1);
}

#[test]
fn migrating_an_up_to_date_database_is_a_noop() {
    let mut conn = open_db_in_memory().unwrap();
    let outcome = apply_migrations(&mut conn).unwrap();
    assert_eq!(
        outcome,
        MigrationOutcome {
            from: latest_version(),
            to: latest_version()
        }
    );
    assert!(!outcome.applied());
}

#[test]
fn blank_connection_migrates_from_zero() {
    let mut conn = Connection::open_in_memory().unwrap();
    let outcome = apply_migrations(&mut conn).unwrap();
    assert_eq!(outcome.from, 0);
    assert!(outcome.applied());
    assert_eq!(kv_table_count(&conn), 1);
}

#[test]
fn reopening_keeps_stored_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("school").join("rollcall.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES ('currentRoster', 'Period 2');",
            [],
        )
        .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(user_version(&conn), latest_version());
    let value: String = conn
        .query_row(
            "SELECT value FROM kv_entries WHERE key = 'currentRoster';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(value, "Period 2");
}

#[test]
fn database_from_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("newer.sqlite3");
    Connection::open(&path)
        .unwrap()
        .pragma_update(None, "user_version", 42)
        .unwrap();

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => assert_eq!((db_version, latest_supported), (42, latest_version())),
        other => panic!("expected schema version error, got {other}"),
    }
}
