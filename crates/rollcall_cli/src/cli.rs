//! Command-line surface for the `rollcall` binary.
//!
//! # Responsibility
//! - Declare global flags and the roster/student/report subcommands.
//! - Map verbosity flags onto a log level override.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rollcall_core::AttendanceFilter;

/// rollcall - classroom attendance tracker
///
/// Keeps named class rosters, records who is present today, picks a random
/// present student and exports attendance sheets as CSV.
#[derive(Debug, Parser)]
#[command(name = "rollcall")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the roster database location
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Do not mirror warnings to stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage rosters
    #[command(subcommand)]
    Roster(RosterCommand),

    /// Manage students in the current roster
    #[command(subcommand)]
    Student(StudentCommand),

    /// List students in the current roster
    List(ListCommand),

    /// Show attendance counts for the current roster
    Summary,

    /// Pick a random present student
    Pick,

    /// Write the current roster as a CSV attendance sheet
    Export(ExportCommand),
}

#[derive(Debug, Subcommand)]
pub enum RosterCommand {
    /// List rosters, marking the current one
    List,

    /// Create an empty roster and switch to it
    Create { name: String },

    /// Delete a roster (the last roster cannot be deleted)
    Delete { name: String },

    /// Make another roster current
    Switch { name: String },

    /// Rename a roster
    Rename { old_name: String, new_name: String },
}

#[derive(Debug, Subcommand)]
pub enum StudentCommand {
    /// Add one student, initially absent
    Add { name: String },

    /// Import one student per line from a file ("-" reads stdin)
    Import {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Flip a student between present and absent
    Toggle {
        /// Student id or a unique prefix of at least 4 characters
        id: String,
    },

    /// Remove a student from the current roster
    Delete {
        /// Student id or a unique prefix of at least 4 characters
        id: String,
    },

    /// Remove every student from the current roster
    Clear,

    /// Mark every student absent
    Reset,

    /// Mark every student present (or absent with --absent)
    MarkAll {
        #[arg(long)]
        absent: bool,
    },
}

#[derive(Debug, Args)]
pub struct ListCommand {
    /// Which students to show: all, present or absent
    #[arg(short, long, default_value = "all")]
    pub filter: AttendanceFilter,
}

#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Directory to write into (defaults to `export.directory`)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Log level forced by `-v` flags, if any.
    #[must_use]
    pub fn level_override(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}
