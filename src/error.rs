use std::path::PathBuf;

use thiserror::Error;

/// Conditions a ledger operation reports to the user instead of failing the
/// process. They travel inside `anyhow::Error` alongside infrastructure
/// failures and are recovered with `downcast_ref`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("project {0} already exists")]
    AlreadyExists(String),

    #[error("no project named {0}")]
    ProjectNotFound(String),

    #[error("date \"{0}\" not correctly formatted, use \"YYYY-MM-DD\"")]
    InvalidDate(String),

    #[error("project name must not be empty")]
    EmptyName,

    #[error("project {name} still has {count} hour entries, remove them first or use --on-remove cascade")]
    HasEntries { name: String, count: usize },

    #[error("database {} does not exist, run --init first", .0.display())]
    StoreUnavailable(PathBuf),

    #[error("{} is the database itself, pick another backup destination", .0.display())]
    SameFile(PathBuf),

    #[error("total hours for project {0} do not fit in a 64-bit integer")]
    HoursOverflow(String),

    #[error("exiting...")]
    Declined,
}

impl LedgerError {
    /// The user said no to a confirmation. Nothing changed, and the
    /// invocation should end successfully.
    pub fn is_clean_abort(&self) -> bool {
        matches!(self, LedgerError::Declined)
    }
}

/// Find a [`LedgerError`] anywhere in an error's context chain.
pub fn ledger_error(err: &anyhow::Error) -> Option<&LedgerError> {
    err.chain().find_map(|cause| cause.downcast_ref::<LedgerError>())
}
