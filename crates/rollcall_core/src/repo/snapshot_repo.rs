//! Roster snapshot encoding over a key-value store.
//!
//! # Responsibility
//! - Serialize the roster collection and current-roster name under two keys.
//! - Load state at startup, migrating the single-list legacy key if needed.
//!
//! # Invariants
//! - Save writes both keys in one `set_many` call.
//! - Decoded rosters pass `AppState::from_parts` validation or loading fails.

use chrono::NaiveDate;
use log::{info, warn};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::db::DbError;
use crate::model::roster::Roster;
use crate::model::state::{AppState, DEFAULT_ROSTER_NAME};
use crate::model::student::StudentRecord;
use crate::repo::kv_store::KeyValueStore;

/// Key holding the JSON array of rosters.
pub const ROSTERS_KEY: &str = "classRosters";
/// Key holding the current roster name as plain text.
pub const CURRENT_ROSTER_KEY: &str = "currentRoster";
/// Key used by the single-roster draft: a JSON array of students.
pub const LEGACY_STUDENTS_KEY: &str = "classStudents";

const LEGACY_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Snapshot persistence and decoding errors.
#[derive(Debug)]
pub enum RepoError {
    Storage(DbError),
    Serialization(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "snapshot encoding failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted roster data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Where the loaded state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    /// Nothing persisted; a fresh `Default` roster was created.
    Fresh,
    /// Decoded from the roster keys.
    Stored,
    /// Built from the legacy single-list key.
    Legacy { migrated: usize },
}

#[derive(Debug, Deserialize)]
struct LegacyStudent {
    name: String,
    #[serde(default)]
    present: bool,
    #[serde(default)]
    date: Option<String>,
}

/// Reads and writes `AppState` snapshots through a key-value store.
pub struct SnapshotRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SnapshotRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads persisted state.
    ///
    /// `today` stamps legacy records whose date cannot be parsed.
    ///
    /// # Errors
    /// - `Storage` when the store cannot be read.
    /// - `Serialization` when a key holds malformed JSON.
    /// - `InvalidData` when decoded rosters break state invariants.
    pub fn load(&self, today: NaiveDate) -> RepoResult<(AppState, SnapshotSource)> {
        if let Some(encoded) = self.store.get(ROSTERS_KEY)? {
            let rosters: Vec<Roster> = serde_json::from_str(&encoded)?;
            let current = self.store.get(CURRENT_ROSTER_KEY)?;
            let state = AppState::from_parts(rosters, current.as_deref())
                .map_err(|err| RepoError::InvalidData(err.to_string()))?;
            if current.as_deref() != Some(state.current_roster_name()) {
                warn!(
                    "event=snapshot_load module=repo status=repaired reason=current_roster_unresolved"
                );
            }
            info!(
                "event=snapshot_load module=repo status=ok source=stored rosters={}",
                state.rosters().len()
            );
            return Ok((state, SnapshotSource::Stored));
        }

        if let Some(encoded) = self.store.get(LEGACY_STUDENTS_KEY)? {
            let legacy: Vec<LegacyStudent> = serde_json::from_str(&encoded)?;
            let mut state = AppState::new();
            let mut migrated = 0;
            for entry in legacy {
                let last_updated = entry
                    .date
                    .as_deref()
                    .and_then(parse_legacy_date)
                    .unwrap_or(today);
                // Blank legacy names cannot satisfy the record invariant; skip them.
                let Ok(mut student) = StudentRecord::new(&entry.name, last_updated) else {
                    continue;
                };
                student.present = entry.present;
                migrated += 1;
                state.push_migrated(student);
            }
            info!(
                "event=snapshot_load module=repo status=ok source=legacy migrated={migrated} roster={DEFAULT_ROSTER_NAME}"
            );
            return Ok((state, SnapshotSource::Legacy { migrated }));
        }

        info!("event=snapshot_load module=repo status=ok source=fresh");
        Ok((AppState::new(), SnapshotSource::Fresh))
    }

    /// Overwrites both snapshot keys with `state`.
    pub fn save(&self, state: &AppState) -> RepoResult<()> {
        let encoded = serde_json::to_string(state.rosters())?;
        self.store.set_many(&[
            (ROSTERS_KEY, encoded.as_str()),
            (CURRENT_ROSTER_KEY, state.current_roster_name()),
        ])?;
        Ok(())
    }
}

fn parse_legacy_date(value: &str) -> Option<NaiveDate> {
    LEGACY_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value.trim(), format).ok())
}

#[cfg(test)]
mod tests {
    use super::parse_legacy_date;
    use chrono::NaiveDate;

    #[test]
    fn legacy_dates_accept_both_separators() {
        let expected = NaiveDate::from_ymd_opt(2025, 11, 4);
        assert_eq!(parse_legacy_date("2025/11/04"), expected);
        assert_eq!(parse_legacy_date(" 2025-11-04 "), expected);
        assert_eq!(parse_legacy_date("04/11/2025"), None);
    }
}
