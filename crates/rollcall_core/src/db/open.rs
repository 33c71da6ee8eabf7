//! Connection setup for the roster database.
//!
//! # Invariants
//! - Returned connections are migrated to the latest schema.
//! - File databases get their parent directory created on demand.

use super::migrations::apply_migrations;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

enum Target<'a> {
    File(&'a Path),
    Memory,
}

impl Target<'_> {
    fn label(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }

    fn connect(&self) -> DbResult<Connection> {
        match self {
            Self::File(path) => {
                if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                Ok(Connection::open(path)?)
            }
            Self::Memory => Ok(Connection::open_in_memory()?),
        }
    }
}

/// Opens (or creates) the roster database at `path`.
///
/// # Side effects
/// - Creates missing parent directories.
/// - Emits a `db_open` event with the elapsed time and schema version.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open(Target::File(path.as_ref()))
}

/// Opens a private in-memory roster database. Used by tests and dry runs.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open(Target::Memory)
}

fn open(target: Target<'_>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = target.label();

    let result = target.connect().and_then(|mut conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let outcome = apply_migrations(&mut conn)?;
        Ok((conn, outcome))
    });

    match result {
        Ok((conn, outcome)) => {
            info!(
                "event=db_open module=db status=ok mode={mode} schema={} migrated={} duration_ms={}",
                outcome.to,
                outcome.applied(),
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}
