//! Student attendance record.
//!
//! # Responsibility
//! - Define the per-student record stored inside a roster.
//! - Provide the attendance mutations that restamp `last_updated`.
//!
//! # Invariants
//! - `id` is stable and never reused for another student.
//! - `name` is trimmed and never blank.
//! - New records start absent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::roster::RosterValidationError;

/// Stable identifier for one student record.
pub type StudentId = Uuid;

/// One student's attendance state inside a roster.
///
/// Snapshot fields are camelCase (`lastUpdated`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: StudentId,
    pub name: String,
    pub present: bool,
    /// Calendar day of the last attendance change.
    pub last_updated: NaiveDate,
}

impl StudentRecord {
    /// Creates an absent student with a generated stable ID.
    ///
    /// # Errors
    /// - Returns `EmptyStudentName` when `name` is blank after trim.
    pub fn new(name: &str, today: NaiveDate) -> Result<Self, RosterValidationError> {
        Self::with_id(Uuid::new_v4(), name, today)
    }

    /// Creates an absent student with a caller-provided ID.
    ///
    /// Used by legacy migration and tests where identity is fixed upfront.
    pub fn with_id(
        id: StudentId,
        name: &str,
        today: NaiveDate,
    ) -> Result<Self, RosterValidationError> {
        let name = normalize_student_name(name)?;
        Ok(Self {
            id,
            name,
            present: false,
            last_updated: today,
        })
    }

    /// Flips attendance and restamps the record.
    pub fn toggle(&mut self, today: NaiveDate) {
        self.present = !self.present;
        self.last_updated = today;
    }

    /// Sets attendance to `present` and restamps the record.
    pub fn mark(&mut self, present: bool, today: NaiveDate) {
        self.present = present;
        self.last_updated = today;
    }

    /// Human-readable status label used by list and export output.
    pub fn status_label(&self) -> &'static str {
        if self.present {
            "Present"
        } else {
            "Absent"
        }
    }

    /// Checks record-level invariants for data coming from persistence.
    pub fn validate(&self) -> Result<(), RosterValidationError> {
        if self.name.trim().is_empty() {
            return Err(RosterValidationError::EmptyStudentName);
        }
        Ok(())
    }
}

/// Trims a student name and rejects blank input.
pub fn normalize_student_name(name: &str) -> Result<String, RosterValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RosterValidationError::EmptyStudentName);
    }
    Ok(trimmed.to_string())
}
