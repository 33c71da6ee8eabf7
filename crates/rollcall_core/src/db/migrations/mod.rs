//! Schema migrations for the roster database.
//!
//! # Invariants
//! - Migration versions are strictly increasing, starting at 1.
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - Pending steps run in a single transaction; a failed step applies none.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// One schema step: `(version, sql)`.
type Step = (u32, &'static str);

const STEPS: &[Step] = &[(1, include_str!("0001_init.sql"))];

/// Schema versions before and after a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub from: u32,
    pub to: u32,
}

impl MigrationOutcome {
    pub fn applied(&self) -> bool {
        self.to > self.from
    }
}

/// Newest schema version this build can read.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings `conn` up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<MigrationOutcome> {
    let from: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Step> = STEPS.iter().filter(|(version, _)| *version > from).collect();
    if pending.is_empty() {
        return Ok(MigrationOutcome { from, to: from });
    }

    let tx = conn.transaction()?;
    for (version, sql) in &pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from={from} to={latest}");
    Ok(MigrationOutcome { from, to: latest })
}
