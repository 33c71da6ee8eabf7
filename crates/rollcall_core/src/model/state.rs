//! Application state and roster transitions.
//!
//! # Responsibility
//! - Own every roster and student record.
//! - Apply switch/create/rename/delete and student mutations atomically.
//!
//! # Invariants
//! - At least one roster exists and the current roster always resolves.
//! - Roster names are unique; student ids are unique within a roster.
//! - A rejected transition leaves the state unchanged.
//! - The picked-student marker is transient and never persisted.

use chrono::NaiveDate;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::effects::{uniform_index, RandomSource};
use crate::import::parse_student_lines;
use crate::model::roster::{AttendanceFilter, AttendanceSummary, Roster, RosterValidationError};
use crate::model::student::{StudentId, StudentRecord};

/// Name of the roster seeded when nothing is persisted yet.
pub const DEFAULT_ROSTER_NAME: &str = "Default";

/// Errors surfaced by state transitions.
///
/// Missing ids and names are not errors: those transitions are no-ops and
/// report it through their return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Empty or duplicate name input.
    Validation(RosterValidationError),
    /// Refused because it would delete the only remaining roster.
    LastRoster(String),
    /// Random pick requested while nobody is marked present.
    EmptySelection,
}

impl Display for StateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::LastRoster(name) => {
                write!(f, "cannot delete `{name}`: at least one roster must remain")
            }
            Self::EmptySelection => write!(f, "no students are marked present"),
        }
    }
}

impl Error for StateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::LastRoster(_) | Self::EmptySelection => None,
        }
    }
}

impl From<RosterValidationError> for StateError {
    fn from(value: RosterValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Every roster plus the current-roster reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    rosters: Vec<Roster>,
    // Index into `rosters`; kept in bounds by every transition.
    current: usize,
    picked: Option<StudentId>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates state with one empty `Default` roster.
    pub fn new() -> Self {
        Self {
            rosters: vec![Roster::new(DEFAULT_ROSTER_NAME.to_string())],
            current: 0,
            picked: None,
        }
    }

    /// Rebuilds state from persisted parts.
    ///
    /// # Contract
    /// - An empty roster list yields the `Default` roster.
    /// - A missing or unknown `current_name` selects the first roster.
    ///
    /// # Errors
    /// - Returns the first roster-level validation failure, including
    ///   duplicate roster names.
    pub fn from_parts(
        rosters: Vec<Roster>,
        current_name: Option<&str>,
    ) -> Result<Self, RosterValidationError> {
        if rosters.is_empty() {
            return Ok(Self::new());
        }

        let mut names = HashSet::with_capacity(rosters.len());
        for roster in &rosters {
            roster.validate()?;
            if !names.insert(roster.name.as_str()) {
                return Err(RosterValidationError::DuplicateRosterName(
                    roster.name.clone(),
                ));
            }
        }

        let current = current_name
            .and_then(|name| rosters.iter().position(|roster| roster.name == name))
            .unwrap_or(0);

        Ok(Self {
            rosters,
            current,
            picked: None,
        })
    }

    /// All rosters in creation order.
    pub fn rosters(&self) -> &[Roster] {
        &self.rosters
    }

    pub fn roster(&self, name: &str) -> Option<&Roster> {
        self.rosters.iter().find(|roster| roster.name == name)
    }

    pub fn current_roster(&self) -> &Roster {
        &self.rosters[self.current]
    }

    pub fn current_roster_name(&self) -> &str {
        self.current_roster().name.as_str()
    }

    /// Student chosen by the last random pick, if it is still on the roster.
    pub fn picked_student(&self) -> Option<&StudentRecord> {
        self.picked
            .and_then(|id| self.current_roster().student(id))
    }

    /// Selects `name` as the current roster.
    ///
    /// Returns `false` without side effects when `name` does not exist.
    pub fn switch_roster(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.current = index;
                self.picked = None;
                true
            }
            None => false,
        }
    }

    /// Appends a new empty roster and makes it current.
    pub fn create_roster(&mut self, name: &str) -> Result<&Roster, StateError> {
        let name = self.validate_new_roster_name(name)?;
        self.rosters.push(Roster::new(name));
        self.current = self.rosters.len() - 1;
        self.picked = None;
        Ok(&self.rosters[self.current])
    }

    /// Renames a roster, keeping its id and students.
    ///
    /// Returns `Ok(false)` when `old_name` does not exist. Renaming a roster
    /// to its own name is accepted as a no-op.
    pub fn rename_roster(&mut self, old_name: &str, new_name: &str) -> Result<bool, StateError> {
        let Some(index) = self.position(old_name) else {
            return Ok(false);
        };
        if self.rosters[index].name == new_name.trim() {
            return Ok(false);
        }
        let new_name = self.validate_new_roster_name(new_name)?;
        self.rosters[index].name = new_name;
        Ok(true)
    }

    /// Removes a roster unless it is the last one.
    ///
    /// Returns `Ok(false)` when `name` does not exist.
    pub fn delete_roster(&mut self, name: &str) -> Result<bool, StateError> {
        let Some(index) = self.position(name) else {
            return Ok(false);
        };
        if self.rosters.len() == 1 {
            return Err(StateError::LastRoster(name.to_string()));
        }

        self.rosters.remove(index);
        if index == self.current {
            self.current = 0;
            self.picked = None;
        } else if index < self.current {
            self.current -= 1;
        }
        Ok(true)
    }

    /// Appends one absent student to the current roster.
    pub fn add_student(&mut self, name: &str, today: NaiveDate) -> Result<&StudentRecord, StateError> {
        let student = StudentRecord::new(name, today)?;
        let students = &mut self.current_roster_mut().students;
        students.push(student);
        Ok(&students[students.len() - 1])
    }

    /// Appends one absent student per non-blank line of `raw`.
    ///
    /// Returns the number of students imported.
    pub fn import_students(&mut self, raw: &str, today: NaiveDate) -> usize {
        let imported: Vec<StudentRecord> = parse_student_lines(raw)
            .filter_map(|name| StudentRecord::new(name, today).ok())
            .collect();
        let count = imported.len();
        self.current_roster_mut().students.extend(imported);
        count
    }

    /// Flips one student's attendance in the current roster.
    ///
    /// Returns `None` when the id is not on the current roster.
    pub fn toggle_attendance(
        &mut self,
        id: StudentId,
        today: NaiveDate,
    ) -> Option<&StudentRecord> {
        let student = self.current_roster_mut().student_mut(id)?;
        student.toggle(today);
        Some(student)
    }

    /// Removes one student from the current roster.
    pub fn delete_student(&mut self, id: StudentId) -> Option<StudentRecord> {
        let students = &mut self.current_roster_mut().students;
        let index = students.iter().position(|student| student.id == id)?;
        let removed = students.remove(index);
        if self.picked == Some(id) {
            self.picked = None;
        }
        Some(removed)
    }

    /// Empties the current roster. Returns how many students were removed.
    pub fn clear_roster(&mut self) -> usize {
        let removed = std::mem::take(&mut self.current_roster_mut().students).len();
        self.picked = None;
        removed
    }

    /// Marks every student in the current roster absent.
    pub fn reset_attendance(&mut self, today: NaiveDate) -> usize {
        self.picked = None;
        self.mark_all(false, today)
    }

    /// Sets every student in the current roster to `present`.
    ///
    /// Returns the number of records restamped.
    pub fn mark_all(&mut self, present: bool, today: NaiveDate) -> usize {
        let students = &mut self.current_roster_mut().students;
        for student in students.iter_mut() {
            student.mark(present, today);
        }
        students.len()
    }

    /// Picks one present student uniformly at random.
    pub fn pick_random_present<R: RandomSource + ?Sized>(
        &mut self,
        rng: &R,
    ) -> Result<&StudentRecord, StateError> {
        let roster = &self.rosters[self.current];
        let present: Vec<&StudentRecord> = roster.filtered(AttendanceFilter::Present).collect();
        let index = uniform_index(rng, present.len()).ok_or(StateError::EmptySelection)?;
        let id = present[index].id;
        self.picked = Some(id);
        self.current_roster()
            .student(id)
            .ok_or(StateError::EmptySelection)
    }

    /// Lazy view of the current roster matching `filter`.
    pub fn filtered_view(
        &self,
        filter: AttendanceFilter,
    ) -> impl Iterator<Item = &StudentRecord> + Clone + '_ {
        self.current_roster().filtered(filter)
    }

    pub fn summary(&self) -> AttendanceSummary {
        self.current_roster().summary()
    }

    /// Appends an already-built record to the current roster.
    pub(crate) fn push_migrated(&mut self, student: StudentRecord) {
        self.current_roster_mut().students.push(student);
    }

    fn current_roster_mut(&mut self) -> &mut Roster {
        &mut self.rosters[self.current]
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.rosters.iter().position(|roster| roster.name == name)
    }

    fn validate_new_roster_name(&self, name: &str) -> Result<String, RosterValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RosterValidationError::EmptyRosterName);
        }
        if self.position(trimmed).is_some() {
            return Err(RosterValidationError::DuplicateRosterName(
                trimmed.to_string(),
            ));
        }
        Ok(trimmed.to_string())
    }
}
