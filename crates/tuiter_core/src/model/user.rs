//! User domain model.
//!
//! # Responsibility
//! - Define the referenced "liking" entity and its partial-update patch.
//!
//! # Invariants
//! - `username` and `password` are never blank.
//! - `username` is unique across the `users` table.

use super::id::UserId;
use super::{now_epoch_ms, require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Audience category of a user account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Personal,
    Academic,
    Professional,
}

impl AccountType {
    pub(crate) fn as_db(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Academic => "academic",
            Self::Professional => "professional",
        }
    }

    pub(crate) fn from_db(value: &str) -> Option<Self> {
        match value {
            "personal" => Some(Self::Personal),
            "academic" => Some(Self::Academic),
            "professional" => Some(Self::Professional),
            _ => None,
        }
    }
}

/// Canonical user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Stored as given; hashing belongs to the authentication layer.
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub biography: Option<String>,
    pub account_type: AccountType,
    /// Unix epoch milliseconds.
    pub joined: i64,
}

impl User {
    /// Creates a personal account with a generated id, joined now.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            password: password.into(),
            first_name: None,
            last_name: None,
            email: None,
            biography: None,
            account_type: AccountType::Personal,
            joined: now_epoch_ms(),
        }
    }

    /// Checks required fields before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId);
        }
        require_text("username", &self.username)?;
        require_text("password", &self.password)?;
        Ok(())
    }

    /// Merges every `Some` field of `patch` into this user.
    pub fn apply(&mut self, patch: &UserPatch) {
        if let Some(username) = &patch.username {
            self.username = username.clone();
        }
        if let Some(password) = &patch.password {
            self.password = password.clone();
        }
        if let Some(first_name) = &patch.first_name {
            self.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name = Some(last_name.clone());
        }
        if let Some(email) = &patch.email {
            self.email = Some(email.clone());
        }
        if let Some(biography) = &patch.biography {
            self.biography = Some(biography.clone());
        }
        if let Some(account_type) = patch.account_type {
            self.account_type = account_type;
        }
    }
}

/// Partial update for a user. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub biography: Option<String>,
    pub account_type: Option<AccountType>,
}

/// Closed set of user lookups accepted by the user repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    ByUsername(String),
    ByEmail(String),
    /// Login lookup: both fields must match exactly.
    ByCredentials { username: String, password: String },
}
