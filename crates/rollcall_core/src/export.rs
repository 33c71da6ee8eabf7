//! Attendance CSV export.
//!
//! # Responsibility
//! - Render one roster as `Name,Status,Last Updated` rows.
//! - Build a download file name stamped with roster name and date.
//!
//! # Invariants
//! - Rows follow roster insertion order.
//! - Names containing separators or quotes are RFC 4180 quoted.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::model::roster::Roster;

const CSV_HEADER: [&str; 3] = ["Name", "Status", "Last Updated"];
const DATE_FORMAT: &str = "%Y-%m-%d";

static FILE_NAME_UNSAFE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("valid file name regex"));

/// Errors while rendering CSV output.
#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Encoding(String),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "csv export failed: {err}"),
            Self::Encoding(message) => write!(f, "csv export failed: {message}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Encoding(_) => None,
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Rendered export ready to be written to disk or offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub contents: String,
}

/// Renders `roster` as CSV text with a header row.
pub fn render_csv(roster: &Roster) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for student in &roster.students {
        let date = student.last_updated.format(DATE_FORMAT).to_string();
        writer.write_record([student.name.as_str(), student.status_label(), date.as_str()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Encoding(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ExportError::Encoding(err.to_string()))
}

/// File name for an export of `roster_name` taken on `today`.
pub fn export_file_name(roster_name: &str, today: NaiveDate) -> String {
    let slug = FILE_NAME_UNSAFE_RE.replace_all(roster_name.trim(), "_");
    let slug = slug.trim_matches('_');
    let slug = if slug.is_empty() { "roster" } else { slug };
    format!("attendance_{slug}_{}.csv", today.format(DATE_FORMAT))
}

/// Renders the roster and names the file in one step.
pub fn export_roster(roster: &Roster, today: NaiveDate) -> Result<CsvExport, ExportError> {
    Ok(CsvExport {
        file_name: export_file_name(&roster.name, today),
        contents: render_csv(roster)?,
    })
}
