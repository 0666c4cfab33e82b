//! User use-case service.
//!
//! Thin wrapper that gives callers string-id entry points over any
//! `EntityRepository` of users.

use crate::model::id::UserId;
use crate::model::user::{User, UserFilter, UserPatch};
use crate::repo::entity::EntityRepository;
use crate::repo::RepoResult;

/// Use-case service wrapper for user CRUD operations.
pub struct UserService<R> {
    repo: R,
}

impl<R> UserService<R>
where
    R: EntityRepository<Entity = User, Id = UserId, Patch = UserPatch, Filter = UserFilter>,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn find_all_users(&self) -> RepoResult<Vec<User>> {
        self.repo.find_all()
    }

    pub fn find_user_by_id(&self, uid: &str) -> RepoResult<Option<User>> {
        self.repo.find_by_id(UserId::parse(uid)?)
    }

    /// Login lookup; `None` when no account matches both fields.
    pub fn find_user_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> RepoResult<Option<User>> {
        self.repo.find_one(&UserFilter::ByCredentials {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn find_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.repo
            .find_one(&UserFilter::ByUsername(username.to_string()))
    }

    pub fn create_user(&self, user: &User) -> RepoResult<User> {
        self.repo.create(user)
    }

    /// Merges `patch` into user `uid`. Unknown ids are `NotFound`.
    pub fn update_user(&self, uid: &str, patch: &UserPatch) -> RepoResult<User> {
        self.repo.update_by_id(UserId::parse(uid)?, patch)
    }

    pub fn delete_user(&self, uid: &str) -> RepoResult<usize> {
        self.repo.delete_by_id(UserId::parse(uid)?)
    }

    pub fn delete_user_by_username(&self, username: &str) -> RepoResult<usize> {
        self.repo
            .delete_by_filter(&UserFilter::ByUsername(username.to_string()))
    }

    pub fn delete_all_users(&self) -> RepoResult<usize> {
        self.repo.delete_all()
    }
}
