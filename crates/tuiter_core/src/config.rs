//! Runtime configuration for core bootstrap.
//!
//! # Responsibility
//! - Collect database and logging settings from defaults and environment.
//! - Validate values with the same rules `init_logging` applies.
//!
//! # Invariants
//! - Missing variables fall back to defaults; present but invalid values are
//!   rejected instead of ignored.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "TUITER_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "TUITER_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TUITER_LOG_DIR";

/// A configuration variable is present but unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub reason: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid `{}`: {}", self.key, self.reason)
    }
}

impl Error for ConfigError {}

/// Settings needed to bring the core up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file. `None` selects an in-memory database.
    pub db_path: Option<PathBuf>,
    /// Normalized log level (`trace|debug|info|warn|error`).
    pub log_level: &'static str,
    /// Absolute log directory. `None` leaves file logging off.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads `TUITER_DB_PATH`, `TUITER_LOG_LEVEL` and `TUITER_LOG_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds config from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(|err| ConfigError {
                key: ENV_LOG_LEVEL,
                reason: err.to_string(),
            })?;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(normalize_log_dir(&dir).map_err(|err| ConfigError {
                key: ENV_LOG_DIR,
                reason: err.to_string(),
            })?);
        }

        Ok(config)
    }

    /// Opens the configured database with the schema applied.
    pub fn open_db(&self) -> DbResult<Connection> {
        match &self.db_path {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| values.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = CoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn environment_values_override_defaults() {
        let log_dir = std::env::temp_dir().join("tuiter-config-test");
        let log_dir_str = log_dir.to_str().unwrap();
        let config = CoreConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/var/lib/tuiter/tuiter.db"),
            (ENV_LOG_LEVEL, " WARNING "),
            (ENV_LOG_DIR, log_dir_str),
        ]))
        .unwrap();

        assert_eq!(
            config.db_path,
            Some(PathBuf::from("/var/lib/tuiter/tuiter.db"))
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(log_dir));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = CoreConfig::from_lookup(lookup_from(&[(ENV_LOG_LEVEL, "loud")])).unwrap_err();
        assert_eq!(err.key, ENV_LOG_LEVEL);
        assert!(err.reason.contains("unsupported log level"));

        let err = CoreConfig::from_lookup(lookup_from(&[(ENV_LOG_DIR, "logs/dev")])).unwrap_err();
        assert_eq!(err.key, ENV_LOG_DIR);
        assert!(err.reason.contains("absolute"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = CoreConfig::from_lookup(lookup_from(&[(ENV_DB_PATH, "  ")])).unwrap();
        assert_eq!(config.db_path, None);
    }

    #[test]
    fn default_config_opens_in_memory_database() {
        let conn = CoreConfig::default().open_db().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM likes;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
