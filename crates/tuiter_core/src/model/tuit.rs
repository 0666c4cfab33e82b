//! Tuit (post) domain model.

use super::id::{TuitId, UserId};
use super::{now_epoch_ms, require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// A short post authored by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tuit {
    pub id: TuitId,
    pub tuit: String,
    /// Author reference. Not enforced against `users`.
    pub posted_by: UserId,
    /// Unix epoch milliseconds.
    pub posted_on: i64,
}

impl Tuit {
    /// Creates a tuit with a generated id, posted now.
    pub fn new(posted_by: UserId, tuit: impl Into<String>) -> Self {
        Self {
            id: TuitId::new(),
            tuit: tuit.into(),
            posted_by,
            posted_on: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() || self.posted_by.is_nil() {
            return Err(ValidationError::NilId);
        }
        require_text("tuit", &self.tuit)
    }

    /// Merges every `Some` field of `patch` into this tuit.
    pub fn apply(&mut self, patch: &TuitPatch) {
        if let Some(tuit) = &patch.tuit {
            self.tuit = tuit.clone();
        }
    }
}

/// Partial update for a tuit. Authorship and post time are immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TuitPatch {
    pub tuit: Option<String>,
}

/// Closed set of tuit lookups accepted by the tuit repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuitFilter {
    ByAuthor(UserId),
}
