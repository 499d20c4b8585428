//! The operations behind every command. Each one opens its own connection,
//! does its work inside a single transaction, and drops the connection before
//! returning, so nothing is carried between invocations.
//!
//! Project names are trimmed and lower-cased before they touch the store,
//! which makes every lookup case-insensitive.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::clock::Clock;
use crate::config::RemovalPolicy;
use crate::confirm::Confirm;
use crate::db::{self, Store};
use crate::error::LedgerError;
use crate::models::{
    HourEntry, InitStatus, Project, ProjectReport, ProjectTotal, RemovedProject, DATE_FORMAT,
};

pub struct Ledger {
    store: Store,
    clock: Box<dyn Clock>,
    confirm: Box<dyn Confirm>,
    removal_policy: RemovalPolicy,
}

impl Ledger {
    pub fn new(
        store: Store,
        clock: Box<dyn Clock>,
        confirm: Box<dyn Confirm>,
        removal_policy: RemovalPolicy,
    ) -> Self {
        Self {
            store,
            clock,
            confirm,
            removal_policy,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn initialize(&self) -> Result<InitStatus> {
        self.store.initialize()
    }

    /// Copy the database file to `dest`, asking first when `dest` is already
    /// there. `dest` may not be the database file itself.
    pub fn backup(&mut self, dest: &Path) -> Result<()> {
        if !self.store.exists() {
            return Err(LedgerError::StoreUnavailable(self.store.path().to_path_buf()).into());
        }
        if self.store.is_same_file(dest)? {
            return Err(LedgerError::SameFile(dest.to_path_buf()).into());
        }
        if dest.exists()
            && !self
                .confirm
                .confirm("destination file already exists, overwrite it?")?
        {
            return Err(LedgerError::Declined.into());
        }
        self.store.backup_to(dest)?;
        Ok(())
    }

    pub fn create_project(
        &self,
        name: &str,
        salary: Option<f64>,
        allocated: Option<i64>,
    ) -> Result<Project> {
        let name = normalize_name(name)?;
        let mut conn = self.store.open()?;
        let tx = conn.transaction().context("failed to start transaction")?;

        if db::find_project_by_name(&tx, &name)?.is_some() {
            return Err(LedgerError::AlreadyExists(name).into());
        }
        let project = db::insert_project(&tx, &name, salary, allocated)?;

        tx.commit().context("failed to commit new project")?;
        tracing::debug!(id = project.id, name = %project.name, "created project");
        Ok(project)
    }

    /// Remove a project after the user agrees. What happens to its entries
    /// is decided by the configured [`RemovalPolicy`]; either way no entry
    /// is left pointing at the removed id.
    pub fn remove_project(&mut self, name: &str) -> Result<RemovedProject> {
        let name = normalize_name(name)?;
        let mut conn = self.store.open()?;
        let tx = conn.transaction().context("failed to start transaction")?;

        let project = db::find_project_by_name(&tx, &name)?
            .ok_or_else(|| LedgerError::ProjectNotFound(name.clone()))?;
        let count = db::count_entries(&tx, project.id)?;

        if count > 0 && self.removal_policy == RemovalPolicy::Reject {
            return Err(LedgerError::HasEntries { name, count }.into());
        }

        let question = match count {
            0 => format!("remove project {name}?"),
            n => format!("remove project {name} and its {n} hour entries?"),
        };
        if !self.confirm.confirm(&question)? {
            return Err(LedgerError::Declined.into());
        }

        let entries_removed = db::delete_entries_for_project(&tx, project.id)?;
        db::delete_project(&tx, project.id)?;
        tx.commit().context("failed to commit project removal")?;

        tracing::debug!(id = project.id, name = %name, entries_removed, "removed project");
        Ok(RemovedProject {
            name,
            entries_removed,
        })
    }

    /// Every project with its summed hours. An empty list means there are
    /// no projects at all.
    pub fn list_projects(&self) -> Result<Vec<ProjectTotal>> {
        let conn = self.store.open()?;
        db::project_totals(&conn)
    }

    /// Log `amount` hours against a project. `date` must be `YYYY-MM-DD`
    /// when given; otherwise the clock supplies today.
    pub fn add_hours(
        &self,
        name: &str,
        amount: i64,
        date: Option<&str>,
    ) -> Result<(Project, HourEntry)> {
        let name = normalize_name(name)?;
        let mut conn = self.store.open()?;
        let tx = conn.transaction().context("failed to start transaction")?;

        let project = db::find_project_by_name(&tx, &name)?
            .ok_or_else(|| LedgerError::ProjectNotFound(name.clone()))?;
        let date = match date {
            Some(raw) => parse_date(raw)?,
            None => self.clock.today(),
        };

        let entry = db::insert_entry(&tx, project.id, date, amount)?;
        tx.commit().context("failed to commit hour entry")?;

        tracing::debug!(project = %name, amount, %date, "added hours");
        Ok((project, entry))
    }

    pub fn show_project(&self, name: &str) -> Result<ProjectReport> {
        let name = normalize_name(name)?;
        let mut conn = self.store.open()?;
        // Read both queries from one snapshot.
        let tx = conn.transaction().context("failed to start transaction")?;

        let project = db::find_project_by_name(&tx, &name)?
            .ok_or_else(|| LedgerError::ProjectNotFound(name.clone()))?;
        let entries = db::entries_for_project(&tx, project.id)?;
        tx.finish().context("failed to close read transaction")?;

        Ok(ProjectReport::new(project, entries)?)
    }
}

fn normalize_name(name: &str) -> Result<String, LedgerError> {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        Err(LedgerError::EmptyName)
    } else {
        Ok(name)
    }
}

/// Strict ISO calendar date. Out-of-range months or days are rejected.
pub fn parse_date(raw: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| LedgerError::InvalidDate(raw.to_string()))
}
