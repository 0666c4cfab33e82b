//! Domain model for users, tuits and the likes between them.
//!
//! # Responsibility
//! - Define canonical data structures used by repositories and services.
//! - Keep identifier parsing and field validation next to the types.
//!
//! # Invariants
//! - Every stored object is identified by a non-nil UUID newtype.
//! - A `Like` owns neither endpoint; it only references them by id.

pub mod id;
pub mod like;
pub mod tuit;
pub mod user;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level validation failure raised before any write reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The nil UUID is reserved and never identifies a stored object.
    NilId,
    /// A required text field is empty after trimming.
    BlankField(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "nil uuid is not a valid identifier"),
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}

/// Current wall-clock time as Unix epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
