//! Like association model.
//!
//! # Responsibility
//! - Define the stored join record between a liking user and a liked tuit.
//! - Define the expanded read shapes produced by populate-style reads.
//!
//! # Invariants
//! - A `Like` is immutable once stored; there is no update path.
//! - At most one `Like` exists per `(liked_by, tuit)` pair.

use super::id::{LikeId, TuitId, UserId};
use super::tuit::Tuit;
use super::user::User;
use serde::{Deserialize, Serialize};

/// Stored association: `liked_by` likes `tuit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Like {
    /// Surrogate id assigned by the store on insert.
    pub id: LikeId,
    pub liked_by: UserId,
    pub tuit: TuitId,
}

/// Like read by tuit, with the liking user expanded.
///
/// `liked_by` is `None` when the referenced user no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeWithUser {
    pub id: LikeId,
    pub liked_by: Option<User>,
    pub tuit: TuitId,
}

/// Like read by user, with the liked tuit expanded.
///
/// `tuit` is `None` when the referenced tuit no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeWithTuit {
    pub id: LikeId,
    pub liked_by: UserId,
    pub tuit: Option<Tuit>,
}

/// Closed set of predicates the like store accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeQuery {
    ByTuit(TuitId),
    ByUser(UserId),
    ByExactPair { liked_by: UserId, tuit: TuitId },
}
