//! Tuit repository backed by SQLite.
//!
//! # Responsibility
//! - Provide `EntityRepository` CRUD over the `tuits` table.
//! - Provide the author timeline lookup used by profile views.
//!
//! # Invariants
//! - `posted_by` is stored as a plain reference; authors are not verified.
//! - Timeline reads are ordered newest first, ties broken by insertion.

use super::entity::EntityRepository;
use super::{
    ensure_table_ready, placeholders, uuid_column, write_scope, RepoError, RepoResult,
    BATCH_CHUNK_SIZE,
};
use crate::model::id::{TuitId, UserId};
use crate::model::tuit::{Tuit, TuitFilter, TuitPatch};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::HashMap;

const TUIT_COLUMNS: &[&str] = &["id", "tuit", "posted_by", "posted_on"];

const TUIT_SELECT_SQL: &str = "SELECT id, tuit, posted_by, posted_on FROM tuits";

/// Tuit-specific operations on top of generic CRUD.
pub trait TuitRepository:
    EntityRepository<Entity = Tuit, Id = TuitId, Patch = TuitPatch, Filter = TuitFilter>
{
    /// Lists every tuit posted by `author`, newest first.
    fn find_tuits_by_user(&self, author: UserId) -> RepoResult<Vec<Tuit>>;
}

/// SQLite-backed tuit repository.
pub struct SqliteTuitRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTuitRepository<'conn> {
    /// Constructs a repository from a bootstrapped connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "tuits", TUIT_COLUMNS)?;
        Ok(Self { conn })
    }

    fn query_tuits(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Tuit>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tuits = Vec::new();
        while let Some(row) = rows.next()? {
            tuits.push(parse_tuit_row(row)?);
        }
        Ok(tuits)
    }
}

impl EntityRepository for SqliteTuitRepository<'_> {
    type Entity = Tuit;
    type Id = TuitId;
    type Patch = TuitPatch;
    type Filter = TuitFilter;

    fn find_all(&self) -> RepoResult<Vec<Tuit>> {
        self.query_tuits(
            &format!("{TUIT_SELECT_SQL} ORDER BY posted_on DESC, rowid ASC;"),
            Vec::new(),
        )
    }

    fn find_by_id(&self, id: TuitId) -> RepoResult<Option<Tuit>> {
        let tuits = self.query_tuits(
            &format!("{TUIT_SELECT_SQL} WHERE id = ?1;"),
            vec![Value::Text(id.to_string())],
        )?;
        Ok(tuits.into_iter().next())
    }

    fn find_by_ids(&self, ids: &[TuitId]) -> RepoResult<HashMap<TuitId, Tuit>> {
        let mut found = HashMap::with_capacity(ids.len());
        for chunk in ids.chunks(BATCH_CHUNK_SIZE) {
            let sql = format!(
                "{TUIT_SELECT_SQL} WHERE id IN ({});",
                placeholders(chunk.len())
            );
            let bind_values = chunk
                .iter()
                .map(|id| Value::Text(id.to_string()))
                .collect();
            for tuit in self.query_tuits(&sql, bind_values)? {
                found.insert(tuit.id, tuit);
            }
        }
        Ok(found)
    }

    fn find_one(&self, filter: &TuitFilter) -> RepoResult<Option<Tuit>> {
        let (clause, bind_values) = filter_clause(filter);
        let tuits = self.query_tuits(
            &format!("{TUIT_SELECT_SQL} WHERE {clause} ORDER BY rowid ASC LIMIT 1;"),
            bind_values,
        )?;
        Ok(tuits.into_iter().next())
    }

    fn create(&self, tuit: &Tuit) -> RepoResult<Tuit> {
        tuit.validate()?;

        self.conn.execute(
            "INSERT INTO tuits (id, tuit, posted_by, posted_on) VALUES (?1, ?2, ?3, ?4);",
            params![
                tuit.id.to_string(),
                tuit.tuit.as_str(),
                tuit.posted_by.to_string(),
                tuit.posted_on,
            ],
        )?;
        debug!("event=tuit_create module=repo status=ok");

        Ok(tuit.clone())
    }

    fn update_by_id(&self, id: TuitId, patch: &TuitPatch) -> RepoResult<Tuit> {
        write_scope(self.conn, "tuit_update", || {
            let mut tuit = self.find_by_id(id)?.ok_or_else(|| RepoError::NotFound {
                kind: "tuit",
                id: id.to_string(),
            })?;
            tuit.apply(patch);
            tuit.validate()?;

            self.conn.execute(
                "UPDATE tuits SET tuit = ?1 WHERE id = ?2;",
                params![tuit.tuit.as_str(), id.to_string()],
            )?;
            Ok(tuit)
        })
    }

    fn delete_by_id(&self, id: TuitId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM tuits WHERE id = ?1;", [id.to_string()])?;
        debug!("event=tuit_delete module=repo status=ok removed={removed}");
        Ok(removed)
    }

    fn delete_by_filter(&self, filter: &TuitFilter) -> RepoResult<usize> {
        let (clause, bind_values) = filter_clause(filter);
        let removed = self.conn.execute(
            &format!(
                "DELETE FROM tuits
                 WHERE rowid = (SELECT rowid FROM tuits WHERE {clause} ORDER BY rowid ASC LIMIT 1);"
            ),
            params_from_iter(bind_values),
        )?;
        debug!("event=tuit_delete module=repo status=ok mode=filter removed={removed}");
        Ok(removed)
    }

    fn delete_all(&self) -> RepoResult<usize> {
        let removed = self.conn.execute("DELETE FROM tuits;", [])?;
        debug!("event=tuit_delete module=repo status=ok mode=all removed={removed}");
        Ok(removed)
    }
}

impl TuitRepository for SqliteTuitRepository<'_> {
    fn find_tuits_by_user(&self, author: UserId) -> RepoResult<Vec<Tuit>> {
        self.query_tuits(
            &format!("{TUIT_SELECT_SQL} WHERE posted_by = ?1 ORDER BY posted_on DESC, rowid ASC;"),
            vec![Value::Text(author.to_string())],
        )
    }
}

fn filter_clause(filter: &TuitFilter) -> (&'static str, Vec<Value>) {
    match filter {
        TuitFilter::ByAuthor(author) => ("posted_by = ?", vec![Value::Text(author.to_string())]),
    }
}

fn parse_tuit_row(row: &Row<'_>) -> RepoResult<Tuit> {
    let id = TuitId::from_uuid(uuid_column(row, "tuits", "id")?);
    let posted_by = UserId::from_uuid(uuid_column(row, "tuits", "posted_by")?);

    let tuit = Tuit {
        id,
        tuit: row.get("tuit")?,
        posted_by,
        posted_on: row.get("posted_on")?,
    };
    tuit.validate()
        .map_err(|err| RepoError::InvalidData(format!("stored tuit {id}: {err}")))?;
    Ok(tuit)
}
