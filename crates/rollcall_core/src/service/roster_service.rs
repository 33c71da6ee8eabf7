//! Roster use-case service.
//!
//! # Responsibility
//! - Apply `AppState` transitions with the current date and random source.
//! - Persist a full snapshot after every transition that changed state.
//! - Emit metadata-only diagnostic events for each use case.
//!
//! # Invariants
//! - Rejected transitions never reach persistence.
//! - Student names never appear in log lines.

use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::effects::{Clock, PickSignal, RandomSource, SystemEffects};
use crate::export::{export_roster, CsvExport, ExportError};
use crate::model::roster::{AttendanceFilter, AttendanceSummary, RosterId};
use crate::model::state::{AppState, StateError};
use crate::model::student::{StudentId, StudentRecord};
use crate::repo::kv_store::KeyValueStore;
use crate::repo::snapshot_repo::{RepoError, SnapshotRepository, SnapshotSource};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from roster use cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Validation or invariant failure; state is unchanged.
    State(StateError),
    /// Snapshot load/save failure.
    Repo(RepoError),
    /// CSV rendering failure.
    Export(ExportError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::State(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::State(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<StateError> for ServiceError {
    fn from(value: StateError) -> Self {
        Self::State(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ExportError> for ServiceError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

/// Result of a random pick: the chosen record and the celebration signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickOutcome {
    pub student: StudentRecord,
    pub signal: PickSignal,
}

/// Roster store facade over snapshot persistence and effects.
pub struct RosterService<S: KeyValueStore, E = SystemEffects> {
    state: AppState,
    repo: SnapshotRepository<S>,
    effects: E,
}

impl<S: KeyValueStore> RosterService<S, SystemEffects> {
    /// Loads state from `store` using the system clock and entropy.
    pub fn open(store: S) -> ServiceResult<Self> {
        Self::open_with_effects(store, SystemEffects)
    }
}

impl<S: KeyValueStore, E: Clock + RandomSource> RosterService<S, E> {
    /// Loads state from `store` with caller-provided effects.
    ///
    /// # Side effects
    /// - Legacy single-list data is migrated and saved immediately so the
    ///   roster keys become the source of truth.
    pub fn open_with_effects(store: S, effects: E) -> ServiceResult<Self> {
        let repo = SnapshotRepository::new(store);
        let (state, source) = repo.load(effects.today())?;
        let service = Self {
            state,
            repo,
            effects,
        };
        if matches!(source, SnapshotSource::Legacy { .. }) {
            service.persist("legacy_migrate")?;
        }
        Ok(service)
    }

    /// Read-only access to the full application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &S {
        self.repo.store()
    }

    /// Switches the current roster. Unknown names are ignored.
    pub fn switch_roster(&mut self, name: &str) -> ServiceResult<bool> {
        let switched = self.state.switch_roster(name);
        if switched {
            self.persist("roster_switch")?;
        } else {
            info!("event=roster_switch module=service status=noop reason=not_found");
        }
        Ok(switched)
    }

    /// Creates an empty roster and makes it current.
    pub fn create_roster(&mut self, name: &str) -> ServiceResult<RosterId> {
        let id = self
            .state
            .create_roster(name)
            .map(|roster| roster.id)
            .map_err(|err| rejected("roster_create", err))?;
        self.persist("roster_create")?;
        Ok(id)
    }

    /// Renames a roster. Unknown names are ignored.
    pub fn rename_roster(&mut self, old_name: &str, new_name: &str) -> ServiceResult<bool> {
        let renamed = self
            .state
            .rename_roster(old_name, new_name)
            .map_err(|err| rejected("roster_rename", err))?;
        if renamed {
            self.persist("roster_rename")?;
        }
        Ok(renamed)
    }

    /// Deletes a roster unless it is the last one. Unknown names are ignored.
    pub fn delete_roster(&mut self, name: &str) -> ServiceResult<bool> {
        let deleted = self
            .state
            .delete_roster(name)
            .map_err(|err| rejected("roster_delete", err))?;
        if deleted {
            self.persist("roster_delete")?;
        }
        Ok(deleted)
    }

    /// Adds one absent student to the current roster.
    pub fn add_student(&mut self, name: &str) -> ServiceResult<StudentRecord> {
        let today = self.effects.today();
        let student = self
            .state
            .add_student(name, today)
            .cloned()
            .map_err(|err| rejected("student_add", err))?;
        self.persist("student_add")?;
        Ok(student)
    }

    /// Imports one student per non-blank line. Returns the imported count.
    pub fn import_students(&mut self, raw: &str) -> ServiceResult<usize> {
        let count = self.state.import_students(raw, self.effects.today());
        info!("event=student_import module=service status=ok imported={count}");
        if count > 0 {
            self.persist("student_import")?;
        }
        Ok(count)
    }

    /// Flips attendance for `id`. Returns `None` when the id is unknown.
    pub fn toggle_attendance(&mut self, id: StudentId) -> ServiceResult<Option<StudentRecord>> {
        let today = self.effects.today();
        let toggled = self.state.toggle_attendance(id, today).cloned();
        if toggled.is_some() {
            self.persist("attendance_toggle")?;
        }
        Ok(toggled)
    }

    /// Removes one student. Returns `false` when the id is unknown.
    pub fn delete_student(&mut self, id: StudentId) -> ServiceResult<bool> {
        let deleted = self.state.delete_student(id).is_some();
        if deleted {
            self.persist("student_delete")?;
        }
        Ok(deleted)
    }

    /// Empties the current roster. Returns the number of removed students.
    pub fn clear_roster(&mut self) -> ServiceResult<usize> {
        let removed = self.state.clear_roster();
        if removed > 0 {
            self.persist("roster_clear")?;
        }
        Ok(removed)
    }

    /// Marks everyone in the current roster absent.
    pub fn reset_attendance(&mut self) -> ServiceResult<usize> {
        let count = self.state.reset_attendance(self.effects.today());
        if count > 0 {
            self.persist("attendance_reset")?;
        }
        Ok(count)
    }

    /// Marks everyone in the current roster present or absent.
    pub fn mark_all(&mut self, present: bool) -> ServiceResult<usize> {
        let count = self.state.mark_all(present, self.effects.today());
        if count > 0 {
            self.persist("attendance_mark_all")?;
        }
        Ok(count)
    }

    /// Picks a present student uniformly at random.
    ///
    /// The pick marker is transient, so nothing is persisted.
    pub fn pick_random_present(&mut self) -> ServiceResult<PickOutcome> {
        let student = self
            .state
            .pick_random_present(&self.effects)
            .cloned()
            .map_err(|err| rejected("random_pick", err))?;
        info!("event=random_pick module=service status=ok");
        Ok(PickOutcome {
            signal: PickSignal::fire(student.id),
            student,
        })
    }

    /// Lazy view over the current roster.
    pub fn filtered_view(
        &self,
        filter: AttendanceFilter,
    ) -> impl Iterator<Item = &StudentRecord> + Clone + '_ {
        self.state.filtered_view(filter)
    }

    pub fn summary(&self) -> AttendanceSummary {
        self.state.summary()
    }

    /// Renders the current roster as CSV stamped with today's date.
    pub fn export_csv(&self) -> ServiceResult<CsvExport> {
        let export = export_roster(self.state.current_roster(), self.effects.today())?;
        info!(
            "event=csv_export module=service status=ok rows={}",
            self.state.current_roster().students.len()
        );
        Ok(export)
    }

    fn persist(&self, event: &str) -> ServiceResult<()> {
        match self.repo.save(&self.state) {
            Ok(()) => {
                info!(
                    "event={event} module=service status=ok rosters={} students={}",
                    self.state.rosters().len(),
                    self.state.current_roster().students.len()
                );
                Ok(())
            }
            Err(err) => {
                warn!("event={event} module=service status=error error_code=persist_failed error={err}");
                Err(err.into())
            }
        }
    }
}

fn rejected(event: &str, err: StateError) -> ServiceError {
    let code = match &err {
        StateError::Validation(_) => "validation",
        StateError::LastRoster(_) => "invariant_violation",
        StateError::EmptySelection => "empty_selection",
    };
    warn!("event={event} module=service status=rejected error_code={code}");
    ServiceError::State(err)
}
