//! Command execution against a loaded roster service.
//!
//! # Responsibility
//! - Translate parsed subcommands into `RosterService` calls.
//! - Render human-readable output to the given writer.
//! - Resolve short student id prefixes typed by the user.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use log::info;
use rollcall_core::{
    Clock, KeyValueStore, RandomSource, Roster, RosterService, StudentId, StudentRecord,
};

use crate::cli::{Command, ExportCommand, RosterCommand, StudentCommand};

const MIN_ID_PREFIX_LEN: usize = 4;
const SHORT_ID_LEN: usize = 8;
const STDIN_PATH: &str = "-";

/// Runs one command and writes its report to `out`.
pub fn execute<S, E, W>(
    service: &mut RosterService<S, E>,
    command: Command,
    default_export_dir: &Path,
    out: &mut W,
) -> Result<()>
where
    S: KeyValueStore,
    E: Clock + RandomSource,
    W: Write,
{
    match command {
        Command::Roster(cmd) => handle_roster(service, cmd, out),
        Command::Student(cmd) => handle_student(service, cmd, out),
        Command::List(list) => {
            let roster = service.state().current_roster();
            writeln!(out, "{} ({})", roster.name, list.filter)?;
            let mut shown = 0;
            for student in service.filtered_view(list.filter) {
                writeln!(out, "{}", format_student(student))?;
                shown += 1;
            }
            if shown == 0 {
                writeln!(out, "  (no students)")?;
            }
            Ok(())
        }
        Command::Summary => {
            let summary = service.summary();
            writeln!(
                out,
                "{}: {}/{} present ({}%), {} absent",
                service.state().current_roster_name(),
                summary.present,
                summary.total,
                summary.percent_present,
                summary.absent
            )?;
            if summary.is_full_attendance() {
                writeln!(out, "Full attendance!")?;
            }
            Ok(())
        }
        Command::Pick => {
            let outcome = service.pick_random_present().context("cannot pick a student")?;
            if outcome.signal.trigger {
                writeln!(out, "*** {} ***", outcome.student.name)?;
            } else {
                writeln!(out, "{}", outcome.student.name)?;
            }
            Ok(())
        }
        Command::Export(cmd) => handle_export(service, cmd, default_export_dir, out),
    }
}

fn handle_roster<S, E, W>(
    service: &mut RosterService<S, E>,
    command: RosterCommand,
    out: &mut W,
) -> Result<()>
where
    S: KeyValueStore,
    E: Clock + RandomSource,
    W: Write,
{
    match command {
        RosterCommand::List => {
            let current = service.state().current_roster_name();
            for roster in service.state().rosters() {
                let marker = if roster.name == current { "*" } else { " " };
                writeln!(
                    out,
                    "{marker} {} ({} students)",
                    roster.name,
                    roster.students.len()
                )?;
            }
        }
        RosterCommand::Create { name } => {
            service
                .create_roster(&name)
                .with_context(|| format!("cannot create roster `{name}`"))?;
            writeln!(out, "Created roster `{}`", name.trim())?;
        }
        RosterCommand::Delete { name } => {
            let deleted = service
                .delete_roster(&name)
                .with_context(|| format!("cannot delete roster `{name}`"))?;
            if deleted {
                writeln!(out, "Deleted roster `{name}`")?;
            } else {
                writeln!(out, "No roster named `{name}`")?;
            }
            writeln!(out, "Current roster: {}", service.state().current_roster_name())?;
        }
        RosterCommand::Switch { name } => {
            if service.switch_roster(&name)? {
                writeln!(out, "Switched to `{name}`")?;
            } else {
                writeln!(out, "No roster named `{name}`")?;
            }
        }
        RosterCommand::Rename { old_name, new_name } => {
            let renamed = service
                .rename_roster(&old_name, &new_name)
                .with_context(|| format!("cannot rename roster `{old_name}`"))?;
            if renamed {
                writeln!(out, "Renamed `{old_name}` to `{}`", new_name.trim())?;
            } else {
                writeln!(out, "No roster named `{old_name}`")?;
            }
        }
    }
    Ok(())
}

fn handle_student<S, E, W>(
    service: &mut RosterService<S, E>,
    command: StudentCommand,
    out: &mut W,
) -> Result<()>
where
    S: KeyValueStore,
    E: Clock + RandomSource,
    W: Write,
{
    match command {
        StudentCommand::Add { name } => {
            let student = service
                .add_student(&name)
                .context("cannot add student")?;
            writeln!(out, "Added {}", format_student(&student))?;
        }
        StudentCommand::Import { path } => {
            let raw = read_import_source(&path)?;
            let count = service.import_students(&raw)?;
            writeln!(out, "Imported {count} students")?;
        }
        StudentCommand::Toggle { id } => {
            let id = resolve_student_id(service.state().current_roster(), &id)?;
            match service.toggle_attendance(id)? {
                Some(student) => writeln!(out, "{}", format_student(&student))?,
                None => writeln!(out, "No student with id {id}")?,
            }
        }
        StudentCommand::Delete { id } => {
            let id = resolve_student_id(service.state().current_roster(), &id)?;
            if service.delete_student(id)? {
                writeln!(out, "Deleted student {}", short_id(id))?;
            } else {
                writeln!(out, "No student with id {id}")?;
            }
        }
        StudentCommand::Clear => {
            let removed = service.clear_roster()?;
            writeln!(out, "Removed {removed} students")?;
        }
        StudentCommand::Reset => {
            let count = service.reset_attendance()?;
            writeln!(out, "Marked {count} students absent")?;
        }
        StudentCommand::MarkAll { absent } => {
            let count = service.mark_all(!absent)?;
            let label = if absent { "absent" } else { "present" };
            writeln!(out, "Marked {count} students {label}")?;
        }
    }
    Ok(())
}

fn handle_export<S, E, W>(
    service: &RosterService<S, E>,
    command: ExportCommand,
    default_export_dir: &Path,
    out: &mut W,
) -> Result<()>
where
    S: KeyValueStore,
    E: Clock + RandomSource,
    W: Write,
{
    let export = service.export_csv()?;
    let dir = command
        .output
        .unwrap_or_else(|| default_export_dir.to_path_buf());
    fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create export directory {}", dir.display()))?;
    let path = dir.join(&export.file_name);
    fs::write(&path, export.contents.as_bytes())
        .with_context(|| format!("cannot write {}", path.display()))?;
    info!("event=csv_write module=cli status=ok");
    writeln!(out, "Wrote {}", path.display())?;
    Ok(())
}

fn read_import_source(path: &Path) -> Result<String> {
    if path.as_os_str() == STDIN_PATH {
        return std::io::read_to_string(std::io::stdin()).context("cannot read names from stdin");
    }
    fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

/// Resolves a full UUID or a unique id prefix within `roster`.
///
/// A full UUID is returned as-is even when it is not in the roster; the
/// service treats unknown ids as no-ops.
pub fn resolve_student_id(roster: &Roster, raw: &str) -> Result<StudentId> {
    let raw = raw.trim();
    if let Ok(id) = StudentId::parse_str(raw) {
        return Ok(id);
    }
    if raw.len() < MIN_ID_PREFIX_LEN {
        bail!("student id prefix `{raw}` is too short; use at least {MIN_ID_PREFIX_LEN} characters");
    }

    let prefix = raw.to_ascii_lowercase();
    let mut matches = roster
        .students
        .iter()
        .filter(|student| student.id.to_string().starts_with(&prefix));
    let first = matches
        .next()
        .ok_or_else(|| anyhow!("no student in `{}` matches `{raw}`", roster.name))?;
    if matches.next().is_some() {
        bail!("student id prefix `{raw}` is ambiguous");
    }
    Ok(first.id)
}

fn short_id(id: StudentId) -> String {
    id.to_string().chars().take(SHORT_ID_LEN).collect()
}

fn format_student(student: &StudentRecord) -> String {
    let mark = if student.present { "x" } else { " " };
    format!(
        "  {} [{mark}] {} ({}, {})",
        short_id(student.id),
        student.name,
        student.status_label(),
        student.last_updated.format("%Y-%m-%d")
    )
}
