use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rusqlite::{Connection, OpenFlags};

use crate::error::LedgerError;
use crate::models::InitStatus;

/// Handle to the SQLite file backing the ledger. It only remembers where the
/// file lives; every operation opens its own short-lived connection.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create the database file and both tables. An existing file is left
    /// untouched and reported as [`InitStatus::AlreadyExists`]. If the schema
    /// cannot be written, the half-created file is removed again.
    pub fn initialize(&self) -> Result<InitStatus> {
        if self.exists() {
            tracing::debug!(path = %self.path.display(), "database already present");
            return Ok(InitStatus::AlreadyExists);
        }
        if self.path.exists() {
            bail!(
                "{} exists but is not a database file",
                self.path.display()
            );
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }

        remove_on_error(&self.path, || {
            let mut conn =
                Connection::open(&self.path).context("failed to create SQLite database")?;
            let tx = conn
                .transaction()
                .context("failed to start schema transaction")?;
            create_schema(&tx)?;
            tx.commit().context("failed to commit schema")
        })?;

        tracing::debug!(path = %self.path.display(), "database initialized");
        Ok(InitStatus::Created)
    }

    /// Whether `other` names the database file, through any path spelling or
    /// link. A path that does not exist yet is never the same file.
    pub fn is_same_file(&self, other: &Path) -> Result<bool> {
        if !other.exists() || !self.path.exists() {
            return Ok(false);
        }
        let ours = fs::canonicalize(&self.path)
            .with_context(|| format!("failed to resolve {}", self.path.display()))?;
        let theirs = fs::canonicalize(other)
            .with_context(|| format!("failed to resolve {}", other.display()))?;
        Ok(ours == theirs)
    }

    /// Open a read-write connection to an existing store with foreign keys
    /// enforced. A missing file is [`LedgerError::StoreUnavailable`]; the
    /// file is never created here.
    pub fn open(&self) -> Result<Connection> {
        if !self.exists() {
            return Err(LedgerError::StoreUnavailable(self.path.clone()).into());
        }

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("failed to open SQLite database {}", self.path.display()))?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .context("failed to enable foreign keys")?;

        tracing::debug!(path = %self.path.display(), "opened database");
        Ok(conn)
    }

    /// Byte-for-byte copy of the database file to `dest`, replacing whatever
    /// is there. Asking before overwriting is the caller's job. Copying onto
    /// the database itself would truncate it, so that is refused.
    pub fn backup_to(&self, dest: &Path) -> Result<u64> {
        if !self.exists() {
            return Err(LedgerError::StoreUnavailable(self.path.clone()).into());
        }
        if self.is_same_file(dest)? {
            return Err(LedgerError::SameFile(dest.to_path_buf()).into());
        }

        let copied = fs::copy(&self.path, dest).with_context(|| {
            format!(
                "failed to copy {} to {}",
                self.path.display(),
                dest.display()
            )
        })?;
        tracing::debug!(dest = %dest.display(), bytes = copied, "database backed up");
        Ok(copied)
    }
}

/// Run `create`, deleting `path` if it fails. The connection opened inside
/// `create` is closed by the time this looks at the file.
fn remove_on_error<T>(path: &Path, create: impl FnOnce() -> Result<T>) -> Result<T> {
    create().map_err(|err| {
        tracing::debug!(path = %path.display(), error = %err, "removing partial database");
        if let Err(remove_err) = fs::remove_file(path) {
            tracing::warn!(
                path = %path.display(),
                error = %remove_err,
                "failed to remove partial database"
            );
        }
        err
    })
}

/// Both tables, created inside whatever transaction the caller holds.
pub(crate) fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            salary REAL,
            allocated INTEGER
        )",
        [],
    )
    .context("failed to create projects table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS hours (
            id INTEGER PRIMARY KEY,
            project_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            amount INTEGER NOT NULL,
            FOREIGN KEY (project_id) REFERENCES projects (id)
        )",
        [],
    )
    .context("failed to create hours table")?;

    Ok(())
}
