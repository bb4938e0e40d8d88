//! Runtime configuration for the desktop shell.

use std::path::PathBuf;

use anyhow::Context;

/// Environment variable overriding the database location.
pub const DB_PATH_ENV: &str = "ZAIKO_DB_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopConfig {
    /// SQLite database file holding sets, items and settings.
    pub db_path: PathBuf,
}

impl DesktopConfig {
    /// Read configuration from the environment, falling back to the OS data directory.
    pub fn from_env() -> anyhow::Result<Self> {
        let db_path = match std::env::var_os(DB_PATH_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_db_path()?,
        };
        Ok(Self { db_path })
    }

    pub fn with_db_path(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

/// Resolve the default database path: `{app_data_dir}/zaiko/zaiko.db`.
pub fn default_db_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    let mut path = base;
    path.push("zaiko");
    path.push("zaiko.db");
    Ok(path)
}
