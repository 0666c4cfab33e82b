use rusqlite::Connection;
use std::thread;
use tuiter_core::db::schema::SCHEMA_VERSION;
use tuiter_core::db::{open_db, open_db_in_memory, DbError};
use tuiter_core::{RepoError, SqliteLikeStore, SqliteUserRepository};

#[test]
fn open_db_in_memory_applies_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    assert_table_exists(&conn, "users");
    assert_table_exists(&conn, "tuits");
    assert_table_exists(&conn, "likes");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tuiter.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), SCHEMA_VERSION);
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), SCHEMA_VERSION);
    assert_table_exists(&conn_second, "likes");
}

#[test]
fn opening_database_with_unknown_schema_stamp_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaVersionMismatch { found, expected } => {
            assert_eq!(found, 999);
            assert_eq!(expected, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn concurrent_opens_of_fresh_file_bootstrap_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.db");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let path = path.clone();
            thread::spawn(move || open_db(&path).map(|conn| schema_version(&conn)))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), SCHEMA_VERSION);
    }

    let conn = open_db(&path).unwrap();
    assert_table_exists(&conn, "likes");
}

#[test]
fn open_does_not_enable_foreign_key_enforcement() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 0);
}

#[test]
fn likes_table_declares_unique_pair() {
    let conn = open_db_in_memory().unwrap();
    let insert = "INSERT INTO likes (id, liked_by, tuit) VALUES (?1, 'u', 't');";

    conn.execute(insert, ["first"]).unwrap();
    let err = conn.execute(insert, ["second"]).unwrap_err();
    assert!(err.to_string().contains("UNIQUE"));
}

#[test]
fn repositories_reject_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteLikeStore::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, SCHEMA_VERSION),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repositories_reject_connection_missing_table_or_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", SCHEMA_VERSION))
        .unwrap();
    assert!(matches!(
        SqliteLikeStore::try_new(&conn),
        Err(RepoError::MissingRequiredTable("likes"))
    ));

    conn.execute_batch("CREATE TABLE users (id TEXT PRIMARY KEY NOT NULL, username TEXT);")
        .unwrap();
    assert!(matches!(
        SqliteUserRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "users",
            column: "password"
        })
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
