//! One-shot schema bootstrap.
//!
//! A fresh database (`user_version = 0`) receives the tables in
//! `0001_init.sql` and is stamped with [`SCHEMA_VERSION`]. A database
//! already carrying that stamp is left untouched. Any other stamp is
//! refused: there is no upgrade path between schema versions.

use crate::db::{DbError, DbResult};
use log::debug;
use rusqlite::{Connection, TransactionBehavior};

/// The only `user_version` this crate reads and writes.
pub const SCHEMA_VERSION: u32 = 1;

const INIT_SQL: &str = include_str!("0001_init.sql");

/// Creates the tables on a fresh database, or checks the stamp on an
/// existing one.
pub fn bootstrap_schema(conn: &mut Connection) -> DbResult<()> {
    if check_stamp(current_user_version(conn)?)? {
        return Ok(());
    }

    // Re-read under the write lock: another connection may have
    // bootstrapped the same file since the first check.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    if check_stamp(current_user_version(&tx)?)? {
        return Ok(());
    }
    tx.execute_batch(INIT_SQL)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;

    debug!("event=schema_bootstrap module=db status=ok version={SCHEMA_VERSION}");
    Ok(())
}

/// `Ok(true)` when bootstrapped, `Ok(false)` when still blank.
fn check_stamp(found: u32) -> DbResult<bool> {
    match found {
        SCHEMA_VERSION => Ok(true),
        0 => Ok(false),
        found => Err(DbError::SchemaVersionMismatch {
            found,
            expected: SCHEMA_VERSION,
        }),
    }
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
