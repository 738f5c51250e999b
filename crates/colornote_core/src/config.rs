//! Host-supplied configuration for the note core.
//!
//! A host passes `CoreConfig` as JSON (or builds it directly) and calls
//! `bootstrap` once to start logging and open the database.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::logging::{default_log_level, init_logging, LoggingError};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatabaseLocation {
    /// Volatile database, discarded when the connection closes.
    #[default]
    Memory,
    File { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_level_string")]
    pub level: String,
    /// Absolute directory for rolling log files.
    pub dir: PathBuf,
}

impl LogConfig {
    /// Config with the build-mode default level.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            level: default_level_string(),
            dir: dir.into(),
        }
    }
}

fn default_level_string() -> String {
    default_log_level().to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub database: DatabaseLocation,
    /// Logging stays off when absent.
    #[serde(default)]
    pub log: Option<LogConfig>,
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Logging(LoggingError),
    Db(DbError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid core config: {err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for ConfigError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl CoreConfig {
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Opens the configured database with migrations applied.
    pub fn open_database(&self) -> Result<Connection, ConfigError> {
        let conn = match &self.database {
            DatabaseLocation::Memory => open_db_in_memory()?,
            DatabaseLocation::File { path } => open_db(path)?,
        };
        Ok(conn)
    }

    /// Starts logging (when configured) and opens the database.
    pub fn bootstrap(&self) -> Result<Connection, ConfigError> {
        if let Some(log) = self.log.as_ref() {
            init_logging(log)?;
        }
        self.open_database()
    }
}
