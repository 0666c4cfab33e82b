//! Likes use-case service.
//!
//! # Responsibility
//! - Expose the like vocabulary (`user_likes_tuit`, `user_unlikes_tuit`,
//!   and the two listing views) over the like store.
//! - Turn expanded like records into bare users/tuits for callers.
//!
//! # Invariants
//! - Store errors pass through unchanged; only identifier parsing adds
//!   `InvalidReference`.
//! - A missing like and a dangling reference both render as absence, never
//!   as an error.
//! - Liking is idempotent: the store's unique pair constraint turns a
//!   repeated like into a no-op.

use crate::model::id::{TuitId, UserId};
use crate::model::like::Like;
use crate::model::tuit::Tuit;
use crate::model::user::User;
use crate::repo::entity::EntityRepository;
use crate::repo::like_repo::LikeStore;
use crate::repo::RepoResult;
use log::debug;

/// Use-case service for the user-likes-tuit relationship.
pub struct LikeService<L, U, T> {
    likes: L,
    users: U,
    tuits: T,
}

impl<L, U, T> LikeService<L, U, T>
where
    L: LikeStore,
    U: EntityRepository<Entity = User, Id = UserId>,
    T: EntityRepository<Entity = Tuit, Id = TuitId>,
{
    /// Creates a service over a like store and the two entity repositories
    /// used to expand references.
    pub fn new(likes: L, users: U, tuits: T) -> Self {
        Self {
            likes,
            users,
            tuits,
        }
    }

    /// Users that liked tuit `tid`, in like order.
    ///
    /// Likes whose user no longer exists are skipped.
    pub fn find_all_users_that_liked_tuit(&self, tid: &str) -> RepoResult<Vec<User>> {
        let tuit = TuitId::parse(tid)?;
        let users: Vec<User> = self
            .likes
            .find_by_tuit(tuit, &self.users)?
            .into_iter()
            .filter_map(|like| like.liked_by)
            .collect();
        debug!(
            "event=likes_by_tuit module=service status=ok count={}",
            users.len()
        );
        Ok(users)
    }

    /// Tuits liked by user `uid`, in like order.
    ///
    /// Likes whose tuit no longer exists are skipped.
    pub fn find_all_tuits_liked_by_user(&self, uid: &str) -> RepoResult<Vec<Tuit>> {
        let liked_by = UserId::parse(uid)?;
        let tuits: Vec<Tuit> = self
            .likes
            .find_by_user(liked_by, &self.tuits)?
            .into_iter()
            .filter_map(|like| like.tuit)
            .collect();
        debug!(
            "event=likes_by_user module=service status=ok count={}",
            tuits.len()
        );
        Ok(tuits)
    }

    /// Records that user `uid` likes tuit `tid`.
    ///
    /// Returns the stored record; calling again for the same pair returns
    /// the same record.
    pub fn user_likes_tuit(&self, uid: &str, tid: &str) -> RepoResult<Like> {
        let liked_by = UserId::parse(uid)?;
        let tuit = TuitId::parse(tid)?;
        self.likes.insert(liked_by, tuit)
    }

    /// Removes the like of tuit `tid` by user `uid`. Returns 0 or 1.
    pub fn user_unlikes_tuit(&self, uid: &str, tid: &str) -> RepoResult<usize> {
        let liked_by = UserId::parse(uid)?;
        let tuit = TuitId::parse(tid)?;
        self.likes.delete_by_pair(liked_by, tuit)
    }
}
