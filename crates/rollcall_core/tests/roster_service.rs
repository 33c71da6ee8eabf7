mod support;

use rollcall_core::db::open_db;
use rollcall_core::repo::snapshot_repo::{CURRENT_ROSTER_KEY, LEGACY_STUDENTS_KEY, ROSTERS_KEY};
use rollcall_core::{
    AttendanceFilter, KeyValueStore, MemoryKvStore, RepoError, RosterService, ServiceError,
    SqliteKvStore, StateError, DEFAULT_ROSTER_NAME,
};
use support::{day, FixedEffects};
use uuid::Uuid;

fn open_memory(store: &MemoryKvStore) -> RosterService<&MemoryKvStore, FixedEffects> {
    RosterService::open_with_effects(store, FixedEffects::new(day(16))).unwrap()
}

#[test]
fn fresh_store_starts_with_default_roster_and_writes_nothing() {
    let store = MemoryKvStore::new();
    let service = open_memory(&store);

    assert_eq!(service.state().current_roster_name(), DEFAULT_ROSTER_NAME);
    assert!(store.is_empty());
}

#[test]
fn every_mutation_persists_a_snapshot() {
    let store = MemoryKvStore::new();
    let mut service = open_memory(&store);

    service.create_roster("Period 1").unwrap();
    assert_eq!(
        store.get(CURRENT_ROSTER_KEY).unwrap().as_deref(),
        Some("Period 1")
    );

    let student = service.add_student("Peter").unwrap();
    service.toggle_attendance(student.id).unwrap();

    let reopened = open_memory(&store);
    assert_eq!(reopened.state(), service.state());
    let loaded = &reopened.state().current_roster().students[0];
    assert!(loaded.present);
    assert_eq!(loaded.last_updated, day(16));
}

#[test]
fn rejected_transitions_do_not_persist() {
    let store = MemoryKvStore::new();
    let mut service = open_memory(&store);

    let err = service.create_roster("").unwrap_err();
    assert!(matches!(err, ServiceError::State(StateError::Validation(_))));

    let err = service.delete_roster(DEFAULT_ROSTER_NAME).unwrap_err();
    assert!(matches!(err, ServiceError::State(StateError::LastRoster(_))));
    assert_eq!(service.state().rosters().len(), 1);
    assert!(store.is_empty());
}

#[test]
fn noop_operations_report_false() {
    let store = MemoryKvStore::new();
    let mut service = open_memory(&store);

    assert!(!service.switch_roster("missing").unwrap());
    assert!(!service.delete_student(Uuid::new_v4()).unwrap());
    assert!(service.toggle_attendance(Uuid::new_v4()).unwrap().is_none());
    assert_eq!(service.import_students("\n\n").unwrap(), 0);
    assert!(store.is_empty());
}

#[test]
fn worked_example_summary_and_export() {
    let store = MemoryKvStore::new();
    let mut service = open_memory(&store);

    let peter = service.add_student("Peter").unwrap();
    let john = service.add_student("John").unwrap();
    service.toggle_attendance(peter.id).unwrap();

    let summary = service.summary();
    assert_eq!((summary.total, summary.present, summary.percent_present), (2, 1, 50));

    service.toggle_attendance(john.id).unwrap();
    let summary = service.summary();
    assert_eq!((summary.total, summary.present, summary.percent_present), (2, 2, 100));
    assert!(summary.is_full_attendance());

    let export = service.export_csv().unwrap();
    assert_eq!(export.file_name, "attendance_Default_2026-10-16.csv");
    let lines: Vec<&str> = export.contents.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Name,Status,Last Updated",
            "Peter,Present,2026-10-16",
            "John,Present,2026-10-16",
        ]
    );
}

#[test]
fn pick_returns_present_student_and_signal() {
    let store = MemoryKvStore::new();
    let mut service = open_memory(&store);

    let err = service.pick_random_present().unwrap_err();
    assert!(matches!(err, ServiceError::State(StateError::EmptySelection)));

    service.import_students("A\nB").unwrap();
    let b = service.state().current_roster().students[1].id;
    service.toggle_attendance(b).unwrap();

    let outcome = service.pick_random_present().unwrap();
    assert_eq!(outcome.student.id, b);
    assert_eq!(outcome.signal.student_id, b);
    assert!(outcome.signal.trigger);
    assert_eq!(service.state().picked_student().map(|s| s.id), Some(b));
}

#[test]
fn filtered_view_reads_current_roster() {
    let store = MemoryKvStore::new();
    let mut service = open_memory(&store);
    service.import_students("A\nB\nC").unwrap();
    service.mark_all(true).unwrap();
    let b = service.state().current_roster().students[1].id;
    service.toggle_attendance(b).unwrap();

    let absent: Vec<_> = service
        .filtered_view(AttendanceFilter::Absent)
        .map(|s| s.name.clone())
        .collect();
    assert_eq!(absent, vec!["B".to_string()]);
    assert_eq!(service.filtered_view(AttendanceFilter::Present).count(), 2);
}

#[test]
fn clear_reset_and_delete_roster_persist() {
    let store = MemoryKvStore::new();
    let mut service = open_memory(&store);
    service.import_students("A\nB").unwrap();
    service.mark_all(true).unwrap();
    assert_eq!(service.reset_attendance().unwrap(), 2);
    assert_eq!(service.summary().present, 0);

    service.create_roster("Second").unwrap();
    service.import_students("C").unwrap();
    assert_eq!(service.clear_roster().unwrap(), 1);
    assert!(service.delete_roster("Second").unwrap());

    let reopened = open_memory(&store);
    assert_eq!(reopened.state().rosters().len(), 1);
    assert_eq!(reopened.state().current_roster_name(), DEFAULT_ROSTER_NAME);
    assert_eq!(reopened.summary().total, 2);
}

#[test]
fn rename_roster_persists_new_current_name() {
    let store = MemoryKvStore::new();
    let mut service = open_memory(&store);
    assert!(service.rename_roster(DEFAULT_ROSTER_NAME, "Homeroom").unwrap());
    assert_eq!(
        store.get(CURRENT_ROSTER_KEY).unwrap().as_deref(),
        Some("Homeroom")
    );
}

#[test]
fn legacy_single_list_is_migrated_into_default_roster() {
    let store = MemoryKvStore::new();
    store
        .set(
            LEGACY_STUDENTS_KEY,
            r#"[
                {"id": 1, "name": "John Doe", "present": true, "date": "2025/11/04"},
                {"id": 2, "name": "  ", "present": false, "date": "2025/11/04"},
                {"id": 3, "name": "Jane", "present": false, "date": "4 Nov"}
            ]"#,
        )
        .unwrap();

    let service = open_memory(&store);
    let students = &service.state().current_roster().students;
    assert_eq!(students.len(), 2);
    assert_eq!(students[0].name, "John Doe");
    assert!(students[0].present);
    assert_eq!(
        students[0].last_updated,
        chrono::NaiveDate::from_ymd_opt(2025, 11, 4).unwrap()
    );
    assert_eq!(students[1].last_updated, day(16));

    assert!(store.get(ROSTERS_KEY).unwrap().is_some());
}

#[test]
fn invalid_snapshot_is_rejected() {
    let store = MemoryKvStore::new();
    let id = Uuid::new_v4();
    let roster = serde_json::json!([{
        "id": Uuid::new_v4(),
        "name": "Default",
        "students": [
            {"id": id, "name": "A", "present": false, "lastUpdated": "2026-10-01"},
            {"id": id, "name": "B", "present": false, "lastUpdated": "2026-10-01"}
        ]
    }]);
    store.set(ROSTERS_KEY, &roster.to_string()).unwrap();

    let err = RosterService::open_with_effects(&store, FixedEffects::new(day(16)))
        .err()
        .unwrap();
    assert!(matches!(err, ServiceError::Repo(RepoError::InvalidData(_))));

    store.set(ROSTERS_KEY, "{not json").unwrap();
    let err = RosterService::open_with_effects(&store, FixedEffects::new(day(16)))
        .err()
        .unwrap();
    assert!(matches!(err, ServiceError::Repo(RepoError::Serialization(_))));
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("rollcall.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let mut service =
            RosterService::open_with_effects(SqliteKvStore::new(&conn), FixedEffects::new(day(16)))
                .unwrap();
        service.create_roster("Science").unwrap();
        service.import_students("Ada\nGrace").unwrap();
    }

    let conn = open_db(&path).unwrap();
    let service =
        RosterService::open_with_effects(SqliteKvStore::new(&conn), FixedEffects::new(day(17)))
            .unwrap();
    assert_eq!(service.state().current_roster_name(), "Science");
    assert_eq!(service.summary().total, 2);
    assert_eq!(service.state().rosters().len(), 2);
}

#[test]
fn bulk_operations_on_empty_roster_write_nothing() {
    let store = MemoryKvStore::new();
    let mut service = open_memory(&store);

    assert_eq!(service.clear_roster().unwrap(), 0);
    assert_eq!(service.reset_attendance().unwrap(), 0);
    assert_eq!(service.mark_all(true).unwrap(), 0);
    assert!(store.is_empty());
}
