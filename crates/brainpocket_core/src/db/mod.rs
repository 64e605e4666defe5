//! Local SQLite store behind the note board.
//!
//! Every note lives in a single database file, or in a private in-memory
//! database for tests and throwaway sessions. [`open_db`] is the only way
//! in: it enables foreign keys so `note_tags` rows follow their note, then
//! upgrades the schema to [`migrations::latest_version`].
//!
//! # Invariants
//! - A connection handed out by this module is fully migrated.
//! - A file stamped by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or upgrading the note store.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file's `user_version` is ahead of every migration this build ships.
    SchemaTooNew { found: u32, supported: u32 },
    /// One migration script failed; the whole upgrade was rolled back.
    MigrationFailed {
        version: u32,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "note store uses schema v{found} but this build only knows up to v{supported}"
            ),
            Self::MigrationFailed { version, source } => {
                write!(f, "note store migration v{version} failed: {source}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::MigrationFailed { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
