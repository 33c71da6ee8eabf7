//! Core domain logic for rollcall, a classroom attendance tracker.
//! This crate is the single source of truth for roster invariants.

pub mod config;
pub mod db;
pub mod effects;
pub mod export;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{Config, ConfigError};
pub use effects::{Clock, PickSignal, RandomSource, SystemEffects};
pub use export::{export_file_name, render_csv, CsvExport, ExportError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::roster::{AttendanceFilter, AttendanceSummary, Roster, RosterId, RosterValidationError};
pub use model::state::{AppState, StateError, DEFAULT_ROSTER_NAME};
pub use model::student::{StudentId, StudentRecord};
pub use repo::kv_store::{KeyValueStore, MemoryKvStore, SqliteKvStore};
pub use repo::snapshot_repo::{RepoError, SnapshotRepository, SnapshotSource};
pub use service::roster_service::{PickOutcome, RosterService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
