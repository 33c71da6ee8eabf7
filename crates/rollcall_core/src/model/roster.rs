//! Roster model, filters and derived summaries.
//!
//! # Responsibility
//! - Hold one named, ordered list of student records.
//! - Derive filtered views and attendance summaries without side effects.
//!
//! # Invariants
//! - Student order is insertion order.
//! - Student ids are unique within a roster.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

use crate::model::student::{StudentId, StudentRecord};

/// Stable identifier for one roster.
pub type RosterId = Uuid;

/// Validation failures for roster and student input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterValidationError {
    /// Roster name is blank after trim.
    EmptyRosterName,
    /// Another roster already uses this name.
    DuplicateRosterName(String),
    /// Student name is blank after trim.
    EmptyStudentName,
    /// Two students in one roster share an id.
    DuplicateStudentId(StudentId),
}

impl Display for RosterValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRosterName => write!(f, "roster name must not be blank"),
            Self::DuplicateRosterName(name) => write!(f, "roster `{name}` already exists"),
            Self::EmptyStudentName => write!(f, "student name must not be blank"),
            Self::DuplicateStudentId(id) => write!(f, "duplicate student id: {id}"),
        }
    }
}

impl Error for RosterValidationError {}

/// Named collection of students tracked for attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub id: RosterId,
    pub name: String,
    pub students: Vec<StudentRecord>,
}

impl Roster {
    /// Creates an empty roster. The caller is responsible for name checks.
    pub(crate) fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            students: Vec::new(),
        }
    }

    /// Looks up one student by id.
    pub fn student(&self, id: StudentId) -> Option<&StudentRecord> {
        self.students.iter().find(|student| student.id == id)
    }

    pub(crate) fn student_mut(&mut self, id: StudentId) -> Option<&mut StudentRecord> {
        self.students.iter_mut().find(|student| student.id == id)
    }

    /// Returns students matching `filter` in insertion order.
    ///
    /// The iterator borrows the roster and holds no state of its own; calling
    /// this again restarts the view.
    pub fn filtered(
        &self,
        filter: AttendanceFilter,
    ) -> impl Iterator<Item = &StudentRecord> + Clone + '_ {
        self.students
            .iter()
            .filter(move |student| filter.matches(student))
    }

    /// Computes attendance totals for this roster.
    pub fn summary(&self) -> AttendanceSummary {
        let present = self.students.iter().filter(|s| s.present).count();
        AttendanceSummary::from_counts(self.students.len(), present)
    }

    /// Checks roster-level invariants for data coming from persistence.
    pub fn validate(&self) -> Result<(), RosterValidationError> {
        if self.name.trim().is_empty() {
            return Err(RosterValidationError::EmptyRosterName);
        }
        let mut seen = HashSet::with_capacity(self.students.len());
        for student in &self.students {
            student.validate()?;
            if !seen.insert(student.id) {
                return Err(RosterValidationError::DuplicateStudentId(student.id));
            }
        }
        Ok(())
    }
}

/// Attendance filter for roster views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceFilter {
    #[default]
    All,
    Present,
    Absent,
}

impl AttendanceFilter {
    pub fn matches(self, student: &StudentRecord) -> bool {
        match self {
            Self::All => true,
            Self::Present => student.present,
            Self::Absent => !student.present,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

impl FromStr for AttendanceFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(format!(
                "unsupported filter `{other}`; expected all|present|absent"
            )),
        }
    }
}

impl Display for AttendanceFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attendance totals for one roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    /// Rounded to the nearest whole percent; `0` for an empty roster.
    pub percent_present: u32,
}

impl AttendanceSummary {
    fn from_counts(total: usize, present: usize) -> Self {
        let percent_present = if total == 0 {
            0
        } else {
            // present <= total, so the rounded ratio always fits in 0..=100.
            ((present as f64 * 100.0) / total as f64).round() as u32
        };
        Self {
            total,
            present,
            absent: total - present,
            percent_present,
        }
    }

    /// Whether every student is present. Drives the celebration UI.
    pub fn is_full_attendance(&self) -> bool {
        self.total > 0 && self.present == self.total
    }
}
