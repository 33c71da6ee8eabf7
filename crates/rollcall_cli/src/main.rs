//! `rollcall` - command-line front end for the roster store.
//!
//! # Responsibility
//! - Load configuration and start file logging before touching storage.
//! - Open the SQLite-backed roster service and run one command per process.

#![deny(unsafe_code)]

mod cli;
mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rollcall_core::db::open_db;
use rollcall_core::{init_logging, Config, RosterService, SqliteKvStore};

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_from(cli.config.as_deref()).context("cannot load configuration")?;
    let level = cli
        .level_override()
        .unwrap_or(config.logging.level.as_str());
    let log_dir = absolute(&config.log_dir())?;
    init_logging(level, &log_dir, !cli.quiet).context("cannot start logging")?;

    let db_path = cli.db.clone().unwrap_or_else(|| config.database_path());
    let conn = open_db(&db_path)
        .with_context(|| format!("cannot open roster database {}", db_path.display()))?;
    let mut service = RosterService::open(SqliteKvStore::new(&conn))
        .context("cannot load saved rosters")?;
    info!(
        "event=cli_start module=cli status=ok rosters={}",
        service.state().rosters().len()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::execute(&mut service, cli.command, &config.export_dir(), &mut out)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("cannot resolve working directory")?;
    Ok(cwd.join(path))
}
