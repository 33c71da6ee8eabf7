//! Runtime configuration.
//!
//! # Responsibility
//! - Merge defaults, an optional TOML file and `ROLLCALL_` environment
//!   variables into one typed config.
//! - Resolve default storage, log and export locations.
//!
//! # Invariants
//! - A missing config file is not an error; defaults apply.
//! - `logging.level` is validated before the config is returned.

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use crate::logging::{default_log_level, normalize_level};

const APP_DIR_NAME: &str = "rollcall";
const CONFIG_FILE_NAME: &str = "config.toml";
const DATABASE_FILE_NAME: &str = "rollcall.sqlite3";
const LOG_DIR_NAME: &str = "logs";
const ENV_PREFIX: &str = "ROLLCALL_";

/// Configuration loading and validation failures.
#[derive(Debug)]
pub enum ConfigError {
    Extract(Box<figment::Error>),
    Validation(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extract(err) => write!(f, "failed to load configuration: {err}"),
            Self::Validation(message) => write!(f, "invalid configuration: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Extract(err) => Some(err.as_ref()),
            Self::Validation(_) => None,
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        Self::Extract(Box::new(value))
    }
}

/// Application configuration.
///
/// Precedence, highest first: `ROLLCALL_*` environment variables (nested with
/// `__`, e.g. `ROLLCALL_LOGGING__LEVEL`), the TOML file, built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file holding the roster snapshot.
    /// Defaults to `<data dir>/rollcall/rollcall.sqlite3`.
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Defaults to `<data dir>/rollcall/logs`.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where CSV exports are written. Defaults to the working directory.
    pub directory: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from the default file location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration, reading `config_path` instead of the default file.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_file = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);
        Self::from_figment(Self::figment(&config_file))
    }

    fn figment(config_file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.logging.level)
            .map_err(|err| ConfigError::Validation(format!("logging.level: {err}")))?;
        Ok(())
    }

    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(APP_DIR_NAME)
    }

    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.logging
            .directory
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(LOG_DIR_NAME))
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
