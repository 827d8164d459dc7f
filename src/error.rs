use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

/// Failures surfaced by the data layer. Every variant is reported once to the
/// user by the front-end; none of them is retried.
#[derive(Debug, Error)]
pub enum RosterError {
    /// The store could not be opened or is not a usable SQLite database.
    #[error("could not reach the student store at {}: {source}", .path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Edit or delete was requested without a selected row.
    #[error("Select a student first.")]
    NoSelection,
    /// A required field was blank.
    #[error("Student {0} is required.")]
    Validation(&'static str),
    /// A course outside the offered set was submitted.
    #[error("Course {0:?} is not offered.")]
    UnknownCourse(String),
    /// The targeted id no longer exists in storage.
    #[error("Student {0} no longer exists.")]
    NotFound(i64),
    /// Any other statement failure.
    #[error("student query failed: {0}")]
    Storage(#[source] rusqlite::Error),
}

impl RosterError {
    /// Sort a SQLite error into the connection or statement bucket. Codes that
    /// mean "the file itself is unusable" count as connection failures.
    pub(crate) fn from_sqlite(path: &std::path::Path, err: rusqlite::Error) -> Self {
        let unreachable = matches!(
            err.sqlite_error_code(),
            Some(
                ErrorCode::CannotOpen
                    | ErrorCode::NotADatabase
                    | ErrorCode::DatabaseCorrupt
                    | ErrorCode::PermissionDenied
                    | ErrorCode::SystemIoFailure
            )
        );
        if unreachable {
            RosterError::Connection {
                path: path.to_path_buf(),
                source: Box::new(err),
            }
        } else {
            RosterError::Storage(err)
        }
    }
}
