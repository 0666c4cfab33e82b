//! SQLite access for the Tuiter core.
//!
//! `open_db` and `open_db_in_memory` hand out connections whose tables
//! are in place and stamped with [`schema::SCHEMA_VERSION`]. Everything
//! that can go wrong while getting there is a [`DbError`].

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// Failure reported by SQLite itself.
    Sqlite(rusqlite::Error),
    /// The file was stamped by something other than this crate's schema.
    SchemaVersionMismatch { found: u32, expected: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaVersionMismatch { found, expected } => write!(
                f,
                "database carries schema version {found}, this build only knows {expected}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaVersionMismatch { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
