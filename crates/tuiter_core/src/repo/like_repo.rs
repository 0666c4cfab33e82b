//! Like association store backed by SQLite.
//!
//! # Responsibility
//! - Persist `(liked_by, tuit)` join records and look them up by either end.
//! - Expand the opposite endpoint through an entity repository (two-step
//!   read: fetch records, then batch-resolve ids).
//!
//! # Invariants
//! - `UNIQUE (liked_by, tuit)` makes `insert` idempotent: a repeated pair
//!   returns the record already stored and writes nothing.
//! - `delete_by_pair` removes at most one record and never errors on a miss.
//! - Referenced users/tuits are not checked on insert; dangling references
//!   expand to `None`.
//! - Reads return records in insertion order.

use super::entity::EntityRepository;
use super::{ensure_table_ready, uuid_column, write_scope, RepoError, RepoResult};
use crate::model::id::{LikeId, TuitId, UserId};
use crate::model::like::{Like, LikeQuery, LikeWithTuit, LikeWithUser};
use crate::model::tuit::Tuit;
use crate::model::user::User;
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const LIKE_COLUMNS: &[&str] = &["id", "liked_by", "tuit"];

const LIKE_SELECT_SQL: &str = "SELECT id, liked_by, tuit FROM likes";

/// Persistence contract for like records.
pub trait LikeStore {
    /// Stores `liked_by` liking `tuit` and returns the stored record.
    ///
    /// Repeating an existing pair returns the original record unchanged.
    fn insert(&self, liked_by: UserId, tuit: TuitId) -> RepoResult<Like>;

    /// Removes the first record matching the exact pair. Returns 0 or 1.
    fn delete_by_pair(&self, liked_by: UserId, tuit: TuitId) -> RepoResult<usize>;

    /// Raw records matching `query`, in insertion order.
    fn find(&self, query: &LikeQuery) -> RepoResult<Vec<Like>>;

    /// Every like of `tuit` with the liking user expanded.
    fn find_by_tuit<U>(&self, tuit: TuitId, users: &U) -> RepoResult<Vec<LikeWithUser>>
    where
        Self: Sized,
        U: EntityRepository<Entity = User, Id = UserId>,
    {
        let likes = self.find(&LikeQuery::ByTuit(tuit))?;
        let ids = distinct(likes.iter().map(|like| like.liked_by));
        let resolved = users.find_by_ids(&ids)?;

        Ok(likes
            .into_iter()
            .map(|like| LikeWithUser {
                id: like.id,
                liked_by: resolved.get(&like.liked_by).cloned(),
                tuit: like.tuit,
            })
            .collect())
    }

    /// Every like by `liked_by` with the liked tuit expanded.
    fn find_by_user<T>(&self, liked_by: UserId, tuits: &T) -> RepoResult<Vec<LikeWithTuit>>
    where
        Self: Sized,
        T: EntityRepository<Entity = Tuit, Id = TuitId>,
    {
        let likes = self.find(&LikeQuery::ByUser(liked_by))?;
        let ids = distinct(likes.iter().map(|like| like.tuit));
        let resolved = tuits.find_by_ids(&ids)?;

        Ok(likes
            .into_iter()
            .map(|like| LikeWithTuit {
                id: like.id,
                liked_by: like.liked_by,
                tuit: resolved.get(&like.tuit).cloned(),
            })
            .collect())
    }
}

/// SQLite-backed like store.
pub struct SqliteLikeStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLikeStore<'conn> {
    /// Constructs a store from a bootstrapped connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "likes", LIKE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl LikeStore for SqliteLikeStore<'_> {
    fn insert(&self, liked_by: UserId, tuit: TuitId) -> RepoResult<Like> {
        let (created, stored) = write_scope(self.conn, "like_insert", || {
            let created = self.conn.execute(
                "INSERT INTO likes (id, liked_by, tuit)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (liked_by, tuit) DO NOTHING;",
                params![
                    LikeId::new().to_string(),
                    liked_by.to_string(),
                    tuit.to_string()
                ],
            )?;

            let stored = self
                .find(&LikeQuery::ByExactPair { liked_by, tuit })?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "like ({liked_by}, {tuit}) missing right after insert"
                    ))
                })?;
            Ok((created, stored))
        })?;

        debug!(
            "event=like_insert module=repo status=ok created={}",
            created == 1
        );
        Ok(stored)
    }

    fn delete_by_pair(&self, liked_by: UserId, tuit: TuitId) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM likes
             WHERE rowid = (
                SELECT rowid
                FROM likes
                WHERE liked_by = ?1 AND tuit = ?2
                ORDER BY rowid ASC
                LIMIT 1
             );",
            params![liked_by.to_string(), tuit.to_string()],
        )?;
        debug!("event=like_delete module=repo status=ok removed={removed}");
        Ok(removed)
    }

    fn find(&self, query: &LikeQuery) -> RepoResult<Vec<Like>> {
        let (clause, bind_values) = query_clause(query);
        let mut stmt = self.conn.prepare(&format!(
            "{LIKE_SELECT_SQL} WHERE {clause} ORDER BY rowid ASC;"
        ))?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut likes = Vec::new();
        while let Some(row) = rows.next()? {
            likes.push(parse_like_row(row)?);
        }
        Ok(likes)
    }
}

fn query_clause(query: &LikeQuery) -> (&'static str, Vec<Value>) {
    match query {
        LikeQuery::ByTuit(tuit) => ("tuit = ?", vec![Value::Text(tuit.to_string())]),
        LikeQuery::ByUser(liked_by) => ("liked_by = ?", vec![Value::Text(liked_by.to_string())]),
        LikeQuery::ByExactPair { liked_by, tuit } => (
            "liked_by = ? AND tuit = ?",
            vec![
                Value::Text(liked_by.to_string()),
                Value::Text(tuit.to_string()),
            ],
        ),
    }
}

fn parse_like_row(row: &Row<'_>) -> RepoResult<Like> {
    Ok(Like {
        id: LikeId::from_uuid(uuid_column(row, "likes", "id")?),
        liked_by: UserId::from_uuid(uuid_column(row, "likes", "liked_by")?),
        tuit: TuitId::from_uuid(uuid_column(row, "likes", "tuit")?),
    })
}

fn distinct<I, T>(ids: I) -> Vec<T>
where
    I: Iterator<Item = T>,
    T: Copy + Ord,
{
    let mut unique: Vec<T> = ids.collect();
    unique.sort_unstable();
    unique.dedup();
    unique
}
