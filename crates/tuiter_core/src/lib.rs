//! Core domain logic for Tuiter.
//!
//! Owns the "user likes tuit" relationship and the user/tuit repositories
//! it expands references through.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{
    default_log_level, init_from_config, init_logging, logging_status, LoggingError,
};
pub use model::id::{InvalidReference, LikeId, TuitId, UserId};
pub use model::like::{Like, LikeQuery, LikeWithTuit, LikeWithUser};
pub use model::tuit::{Tuit, TuitFilter, TuitPatch};
pub use model::user::{AccountType, User, UserFilter, UserPatch};
pub use model::ValidationError;
pub use repo::entity::EntityRepository;
pub use repo::like_repo::{LikeStore, SqliteLikeStore};
pub use repo::tuit_repo::{SqliteTuitRepository, TuitRepository};
pub use repo::user_repo::SqliteUserRepository;
pub use repo::{RepoError, RepoResult};
pub use service::like_service::LikeService;
pub use service::user_service::UserService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
