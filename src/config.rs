//! Per-invocation settings. Built once in `main` and handed to the store and
//! ledger explicitly.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".time-tracking";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "time-tracking.sqlite";
/// Unit printed after the average rate.
pub const DEFAULT_CURRENCY: &str = "dkk";

/// What happens to a project's hour entries when the project is removed.
/// Neither choice leaves entries pointing at a deleted project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RemovalPolicy {
    /// Delete the entries together with the project.
    #[default]
    Cascade,
    /// Refuse to remove a project that still has entries.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub currency: String,
    pub removal_policy: RemovalPolicy,
}

impl Config {
    /// Fill in defaults for whatever the command line and environment left
    /// unset.
    pub fn resolve(
        db_path: Option<PathBuf>,
        currency: Option<String>,
        removal_policy: Option<RemovalPolicy>,
    ) -> Result<Self> {
        let db_path = match db_path {
            Some(path) => path,
            None => default_db_path()?,
        };
        Ok(Self {
            db_path,
            currency: currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            removal_policy: removal_policy.unwrap_or_default(),
        })
    }
}

/// Resolve the absolute path to the SQLite database inside the user's home.
pub fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
