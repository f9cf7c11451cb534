use std::env;

use log::warn;

use crate::generator::SelectionPolicy;
use crate::workout::DEFAULT_TARGET_SETS;

pub const DEFAULT_DB_PATH: &str = "forge.db";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: String,
    pub selection: SelectionPolicy,
    pub default_target_sets: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            selection: SelectionPolicy::default(),
            default_target_sets: DEFAULT_TARGET_SETS,
        }
    }
}

impl Config {
    pub fn with_db_path(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }

    /// Reads `FORGE_DB_PATH` (or `DATABASE_URL`), `FORGE_EXERCISE_SELECTION` and
    /// `FORGE_DEFAULT_TARGET_SETS`. Unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("FORGE_DB_PATH").or_else(|| lookup("DATABASE_URL")) {
            config.db_path = strip_sqlite_scheme(&path).to_string();
        }

        if let Some(raw) = lookup("FORGE_EXERCISE_SELECTION") {
            match raw.parse() {
                Ok(policy) => config.selection = policy,
                Err(e) => warn!("Ignoring FORGE_EXERCISE_SELECTION: {}", e),
            }
        }

        if let Some(raw) = lookup("FORGE_DEFAULT_TARGET_SETS") {
            match raw.trim().parse::<i64>() {
                Ok(n) if n >= 1 => config.default_target_sets = n,
                _ => warn!("Ignoring FORGE_DEFAULT_TARGET_SETS={}", raw),
            }
        }

        config
    }
}

fn strip_sqlite_scheme(url: &str) -> &str {
    let url = url.trim();
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}
