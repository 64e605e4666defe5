//! Runtime configuration.
//!
//! # Responsibility
//! - Resolve owner, storage, logging and search settings from the environment.
//!
//! # Invariants
//! - Blank variables behave as unset.
//! - `search_threshold` always lies in `[0, 1]`.

use crate::logging::{default_log_level, normalize_level};
use crate::search::fuzzy::{SearchOptions, DEFAULT_THRESHOLD};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_UID: &str = "BRAINPOCKET_UID";
pub const ENV_DB: &str = "BRAINPOCKET_DB";
pub const ENV_LOG_LEVEL: &str = "BRAINPOCKET_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "BRAINPOCKET_LOG_DIR";
pub const ENV_SEARCH_THRESHOLD: &str = "BRAINPOCKET_SEARCH_THRESHOLD";

const DEFAULT_UID: &str = "local";
const DEFAULT_DB_FILE: &str = "brainpocket.sqlite3";

/// Invalid environment value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
    pub message: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.variable, self.message)
    }
}

impl Error for ConfigError {}

/// Settings shared by every entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    pub owner_uid: String,
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub search_threshold: f64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            owner_uid: DEFAULT_UID.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            log_level: default_log_level(),
            log_dir: None,
            search_threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl CoreConfig {
    /// Resolves settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves settings through `lookup`, which maps a variable name to its
    /// raw value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(uid) = read(ENV_UID) {
            config.owner_uid = uid;
        }
        if let Some(path) = read(ENV_DB) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(|message| ConfigError {
                variable: ENV_LOG_LEVEL,
                message,
            })?;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        if let Some(raw) = read(ENV_SEARCH_THRESHOLD) {
            config.search_threshold = parse_threshold(&raw)?;
        }
        Ok(config)
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            threshold: self.search_threshold,
        }
    }
}

fn parse_threshold(raw: &str) -> Result<f64, ConfigError> {
    let value: f64 = raw.parse().map_err(|_| ConfigError {
        variable: ENV_SEARCH_THRESHOLD,
        message: format!("`{raw}` is not a number"),
    })?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError {
            variable: ENV_SEARCH_THRESHOLD,
            message: format!("{value} is outside [0, 1]"),
        });
    }
    Ok(value)
}
