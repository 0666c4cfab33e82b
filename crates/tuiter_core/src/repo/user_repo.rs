//! User repository backed by SQLite.
//!
//! # Responsibility
//! - Provide `EntityRepository` CRUD over the `users` table.
//!
//! # Invariants
//! - Username uniqueness is enforced by storage and surfaces as `Conflict`.
//! - Deleting a user does not touch `likes` or `tuits`.

use super::entity::EntityRepository;
use super::{
    ensure_table_ready, placeholders, uuid_column, write_scope, RepoError, RepoResult,
    BATCH_CHUNK_SIZE,
};
use crate::model::id::UserId;
use crate::model::user::{AccountType, User, UserFilter, UserPatch};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::HashMap;

const USER_COLUMNS: &[&str] = &[
    "id",
    "username",
    "password",
    "first_name",
    "last_name",
    "email",
    "biography",
    "account_type",
    "joined",
];

const USER_SELECT_SQL: &str = "SELECT
    id,
    username,
    password,
    first_name,
    last_name,
    email,
    biography,
    account_type,
    joined
FROM users";

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a bootstrapped connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "users", USER_COLUMNS)?;
        Ok(Self { conn })
    }

    fn query_users(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<User>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }
}

impl EntityRepository for SqliteUserRepository<'_> {
    type Entity = User;
    type Id = UserId;
    type Patch = UserPatch;
    type Filter = UserFilter;

    fn find_all(&self) -> RepoResult<Vec<User>> {
        self.query_users(
            &format!("{USER_SELECT_SQL} ORDER BY joined ASC, rowid ASC;"),
            Vec::new(),
        )
    }

    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let users = self.query_users(
            &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
            vec![Value::Text(id.to_string())],
        )?;
        Ok(users.into_iter().next())
    }

    fn find_by_ids(&self, ids: &[UserId]) -> RepoResult<HashMap<UserId, User>> {
        let mut found = HashMap::with_capacity(ids.len());
        for chunk in ids.chunks(BATCH_CHUNK_SIZE) {
            let sql = format!(
                "{USER_SELECT_SQL} WHERE id IN ({});",
                placeholders(chunk.len())
            );
            let bind_values = chunk
                .iter()
                .map(|id| Value::Text(id.to_string()))
                .collect();
            for user in self.query_users(&sql, bind_values)? {
                found.insert(user.id, user);
            }
        }
        Ok(found)
    }

    fn find_one(&self, filter: &UserFilter) -> RepoResult<Option<User>> {
        let (clause, bind_values) = filter_clause(filter);
        let users = self.query_users(
            &format!("{USER_SELECT_SQL} WHERE {clause} ORDER BY rowid ASC LIMIT 1;"),
            bind_values,
        )?;
        Ok(users.into_iter().next())
    }

    fn create(&self, user: &User) -> RepoResult<User> {
        user.validate()?;

        self.conn.execute(
            "INSERT INTO users (
                id,
                username,
                password,
                first_name,
                last_name,
                email,
                biography,
                account_type,
                joined
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                user.id.to_string(),
                user.username.as_str(),
                user.password.as_str(),
                user.first_name.as_deref(),
                user.last_name.as_deref(),
                user.email.as_deref(),
                user.biography.as_deref(),
                user.account_type.as_db(),
                user.joined,
            ],
        )?;
        debug!("event=user_create module=repo status=ok");

        Ok(user.clone())
    }

    fn update_by_id(&self, id: UserId, patch: &UserPatch) -> RepoResult<User> {
        write_scope(self.conn, "user_update", || {
            let mut user = self.find_by_id(id)?.ok_or_else(|| RepoError::NotFound {
                kind: "user",
                id: id.to_string(),
            })?;
            user.apply(patch);
            user.validate()?;

            self.conn.execute(
                "UPDATE users
                 SET
                    username = ?1,
                    password = ?2,
                    first_name = ?3,
                    last_name = ?4,
                    email = ?5,
                    biography = ?6,
                    account_type = ?7
                 WHERE id = ?8;",
                params![
                    user.username.as_str(),
                    user.password.as_str(),
                    user.first_name.as_deref(),
                    user.last_name.as_deref(),
                    user.email.as_deref(),
                    user.biography.as_deref(),
                    user.account_type.as_db(),
                    id.to_string(),
                ],
            )?;
            Ok(user)
        })
    }

    fn delete_by_id(&self, id: UserId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", [id.to_string()])?;
        debug!("event=user_delete module=repo status=ok removed={removed}");
        Ok(removed)
    }

    fn delete_by_filter(&self, filter: &UserFilter) -> RepoResult<usize> {
        let (clause, bind_values) = filter_clause(filter);
        let removed = self.conn.execute(
            &format!(
                "DELETE FROM users
                 WHERE rowid = (SELECT rowid FROM users WHERE {clause} ORDER BY rowid ASC LIMIT 1);"
            ),
            params_from_iter(bind_values),
        )?;
        debug!("event=user_delete module=repo status=ok mode=filter removed={removed}");
        Ok(removed)
    }

    fn delete_all(&self) -> RepoResult<usize> {
        let removed = self.conn.execute("DELETE FROM users;", [])?;
        debug!("event=user_delete module=repo status=ok mode=all removed={removed}");
        Ok(removed)
    }
}

fn filter_clause(filter: &UserFilter) -> (&'static str, Vec<Value>) {
    match filter {
        UserFilter::ByUsername(username) => ("username = ?", vec![Value::Text(username.clone())]),
        UserFilter::ByEmail(email) => ("email = ?", vec![Value::Text(email.clone())]),
        UserFilter::ByCredentials { username, password } => (
            "username = ? AND password = ?",
            vec![Value::Text(username.clone()), Value::Text(password.clone())],
        ),
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id = UserId::from_uuid(uuid_column(row, "users", "id")?);

    let account_text: String = row.get("account_type")?;
    let account_type = AccountType::from_db(&account_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid account type `{account_text}` in users.account_type"
        ))
    })?;

    let user = User {
        id,
        username: row.get("username")?,
        password: row.get("password")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        biography: row.get("biography")?,
        account_type,
        joined: row.get("joined")?,
    };
    user.validate()
        .map_err(|err| RepoError::InvalidData(format!("stored user {id}: {err}")))?;
    Ok(user)
}
