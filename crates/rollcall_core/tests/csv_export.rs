mod support;

use rollcall_core::{render_csv, AppState};
use support::day;

#[test]
fn empty_roster_exports_header_only() {
    let state = AppState::new();
    let csv = render_csv(state.current_roster()).unwrap();
    assert_eq!(csv, "Name,Status,Last Updated\n");
}

#[test]
fn rows_follow_insertion_order_with_status_labels() {
    let mut state = AppState::new();
    state.import_students("Peter\nJohn", day(1));
    let peter = state.current_roster().students[0].id;
    state.toggle_attendance(peter, day(2));

    let csv = render_csv(state.current_roster()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Name,Status,Last Updated",
            "Peter,Present,2026-10-02",
            "John,Absent,2026-10-01",
        ]
    );
}

#[test]
fn names_with_separators_are_quoted() {
    let mut state = AppState::new();
    state.import_students("Doe, Jane\nO\"Brien", day(3));

    let csv = render_csv(state.current_roster()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[1], "\"Doe, Jane\",Absent,2026-10-03");
    assert_eq!(lines[2], "\"O\"\"Brien\",Absent,2026-10-03");
}
