use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rusqlite::{Connection, OpenFlags};

use crate::error::RosterError;

/// Opens connections to the SQLite file that holds the roster. The gateway
/// only remembers where the store lives; each caller owns the connection it
/// gets back and releases it by dropping it.
#[derive(Debug, Clone)]
pub struct StorageGateway {
    location: PathBuf,
}

impl StorageGateway {
    /// Remember the store location; nothing is opened yet.
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
        }
    }

    /// Path of the SQLite file this gateway opens.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Create the data directory, the database file and the `students` table
    /// when any of them is missing. Safe to call on every startup.
    pub fn initialize(&self) -> Result<(), RosterError> {
        if let Some(parent) = self.location.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| RosterError::Connection {
                    path: self.location.clone(),
                    source: Box::new(err),
                })?;
            }
        }

        let conn = Connection::open(&self.location).map_err(|err| self.classify(err))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS students (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT,
                course TEXT,
                mobile TEXT
            )",
            [],
        )
        .map_err(|err| self.classify(err))?;

        info!("student store ready at {}", self.location.display());
        Ok(())
    }

    /// Open the existing store for one unit of work. The file is never created
    /// here, so a missing store surfaces as a connection failure.
    pub fn connect(&self) -> Result<Connection, RosterError> {
        debug!("opening {}", self.location.display());
        Connection::open_with_flags(
            &self.location,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|err| self.classify(err))
    }

    pub(crate) fn classify(&self, err: rusqlite::Error) -> RosterError {
        RosterError::from_sqlite(&self.location, err)
    }
}
