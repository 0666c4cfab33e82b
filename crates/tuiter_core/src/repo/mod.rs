//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define data access contracts for users, tuits and likes.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Writes validate entities before any SQL mutation.
//! - Reads and deletes that match nothing return empty/zero, never `NotFound`.
//! - Repositories only accept connections bootstrapped by `db::open_*`.

use crate::db::schema::{current_user_version, SCHEMA_VERSION};
use crate::db::DbError;
use crate::model::id::InvalidReference;
use crate::model::ValidationError;
use log::warn;
use rusqlite::{Connection, ErrorCode, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod entity;
pub mod like_repo;
pub mod tuit_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error shared by every repository and the like service.
#[derive(Debug)]
pub enum RepoError {
    /// Storage connection or statement failure. Never retried internally.
    StoreUnavailable(DbError),
    /// Caller passed an identifier that cannot reference anything.
    InvalidReference(InvalidReference),
    /// Entity failed field validation before write.
    Validation(ValidationError),
    /// Targeted update of an entity id that is not stored.
    NotFound { kind: &'static str, id: String },
    /// Write violated a storage constraint, usually a unique key.
    Conflict(String),
    /// Persisted row cannot be converted into a domain value.
    InvalidData(String),
    /// Connection schema is not at the expected version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreUnavailable(err) => write!(f, "store unavailable: {err}"),
            Self::InvalidReference(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Conflict(message) => write!(f, "conflict: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreUnavailable(err) => Some(err),
            Self::InvalidReference(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::Conflict(_) => None,
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::StoreUnavailable(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if is_constraint_violation(&value) {
            return Self::Conflict(value.to_string());
        }
        Self::StoreUnavailable(DbError::Sqlite(value))
    }
}

impl From<InvalidReference> for RepoError {
    fn from(value: InvalidReference) -> Self {
        Self::InvalidReference(value)
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _) if inner.code == ErrorCode::ConstraintViolation
    )
}

/// Verifies a connection carries the bootstrapped schema for one table.
pub(crate) fn ensure_table_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = SCHEMA_VERSION;
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }

    for &column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Runs `body` as one atomic write on a borrowed connection.
///
/// In autocommit mode this is a `BEGIN IMMEDIATE` transaction: the write
/// lock is taken before the first read, so competing writers wait on the
/// busy timeout instead of failing with `SQLITE_BUSY`. When the caller
/// already holds a transaction, the write nests as savepoint `name`.
pub(crate) fn write_scope<T>(
    conn: &Connection,
    name: &'static str,
    body: impl FnOnce() -> RepoResult<T>,
) -> RepoResult<T> {
    if conn.is_autocommit() {
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        let value = body()?;
        tx.commit()?;
        return Ok(value);
    }

    conn.execute_batch(&format!("SAVEPOINT {name};"))?;
    match body() {
        Ok(value) => {
            conn.execute_batch(&format!("RELEASE {name};"))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) =
                conn.execute_batch(&format!("ROLLBACK TO {name}; RELEASE {name};"))
            {
                warn!(
                    "event=savepoint_rollback module=repo status=error savepoint={name} error={rollback_err}"
                );
            }
            Err(err)
        }
    }
}

/// Reads a UUID text column, reporting undecodable values as `InvalidData`.
pub(crate) fn uuid_column(row: &Row<'_>, table: &str, column: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{text}` in {table}.{column}"))
    })
}

/// Builds `?, ?, ?` for an `IN (...)` clause of `count` parameters.
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Upper bound on bound parameters per batched `IN (...)` query.
pub(crate) const BATCH_CHUNK_SIZE: usize = 500;

#[cfg(test)]
mod tests {
    use super::placeholders;

    #[test]
    fn placeholders_joins_question_marks() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }
}
