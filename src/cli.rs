//! Command-line surface and dispatch into the ledger.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use crate::clock::SystemClock;
use crate::config::{Config, RemovalPolicy};
use crate::confirm::{AlwaysConfirm, Confirm, PromptConfirm};
use crate::db::Store;
use crate::ledger::Ledger;
use crate::report;

/// Single-dash long options accepted for compatibility with older scripts.
const LEGACY_FLAGS: &[&str] = &[
    "new", "salary", "total", "rm", "ls", "init", "backup", "date",
];

#[derive(Debug, Parser)]
#[command(name = "time-tracking", version)]
#[command(about = "Track hours worked per project.")]
#[command(long_about = "Track hours worked per project.\n\n\
    time-tracking <project> to view a project.\n\
    time-tracking <project> <hours> to add hours to a project.")]
pub struct Cli {
    /// Project to show, or to log hours against when HOURS is given
    pub project: Option<String>,

    /// Hours to add to PROJECT
    #[arg(allow_negative_numbers = true)]
    pub hours: Option<i64>,

    /// Date of the logged hours (YYYY-MM-DD), defaults to today
    #[arg(long, value_name = "DATE", help_heading = "Adding hours")]
    pub date: Option<String>,

    /// Create a new project
    #[arg(long, value_name = "NAME")]
    pub new: Option<String>,

    /// Salary for the whole allocated budget
    #[arg(long, value_name = "SALARY", help_heading = "Creating a project")]
    pub salary: Option<f64>,

    /// Total hours allocated for the project
    #[arg(long, value_name = "HOURS", help_heading = "Creating a project")]
    pub total: Option<i64>,

    /// Remove an existing project
    #[arg(long, value_name = "NAME")]
    pub rm: Option<String>,

    /// List all existing projects
    #[arg(long)]
    pub ls: bool,

    /// Initialize the database
    #[arg(long)]
    pub init: bool,

    /// Back up the database file to DEST
    #[arg(long, value_name = "DEST")]
    pub backup: Option<PathBuf>,

    /// Database file
    #[arg(long, value_name = "PATH", env = "TIME_TRACKING_DB")]
    pub db: Option<PathBuf>,

    /// Currency shown next to the average rate
    #[arg(long, env = "TIME_TRACKING_CURRENCY")]
    pub currency: Option<String>,

    /// What removing a project does with its hour entries
    #[arg(long, value_enum, env = "TIME_TRACKING_ON_REMOVE")]
    pub on_remove: Option<RemovalPolicy>,

    /// Answer yes to every confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// The one thing an invocation does, picked in the same priority order the
/// flags have always had.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Create {
        name: String,
        salary: Option<f64>,
        allocated: Option<i64>,
    },
    Remove(String),
    List,
    Init,
    Backup(PathBuf),
    AddHours {
        project: String,
        hours: i64,
        date: Option<String>,
    },
    Show(String),
}

impl Cli {
    /// `None` when nothing actionable was given and help should be shown.
    pub fn action(&self) -> Option<Action> {
        let action = if let Some(name) = &self.new {
            Action::Create {
                name: name.clone(),
                salary: self.salary,
                allocated: self.total,
            }
        } else if let Some(name) = &self.rm {
            Action::Remove(name.clone())
        } else if self.ls {
            Action::List
        } else if self.init {
            Action::Init
        } else if let Some(dest) = &self.backup {
            Action::Backup(dest.clone())
        } else {
            let project = self.project.clone()?;
            match self.hours {
                Some(hours) => Action::AddHours {
                    project,
                    hours,
                    date: self.date.clone(),
                },
                None => Action::Show(project),
            }
        };
        Some(action)
    }
}

/// Rewrite `-new`, `-ls` and friends to their `--` spelling. Anything else,
/// including negative numbers, passes through untouched.
pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let legacy = arg
                .to_str()
                .and_then(|s| s.strip_prefix('-'))
                .filter(|flag| LEGACY_FLAGS.contains(flag));
            match legacy {
                Some(flag) => OsString::from(format!("--{flag}")),
                None => arg,
            }
        })
        .collect()
}

/// Run one invocation, writing its report to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let Some(action) = cli.action() else {
        write!(out, "{}", Cli::command().render_help()).context("failed to print help")?;
        return Ok(());
    };

    let config = Config::resolve(cli.db, cli.currency, cli.on_remove)?;
    tracing::debug!(db = %config.db_path.display(), ?action, "dispatching");

    let confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AlwaysConfirm(true))
    } else {
        Box::new(PromptConfirm::new(io::stdin().lock(), io::stdout()))
    };
    let mut ledger = Ledger::new(
        Store::new(config.db_path.clone()),
        Box::new(SystemClock),
        confirm,
        config.removal_policy,
    );

    match action {
        Action::Create {
            name,
            salary,
            allocated,
        } => {
            let project = ledger.create_project(&name, salary, allocated)?;
            report::write_created(out, &project)?;
        }
        Action::Remove(name) => {
            let removed = ledger.remove_project(&name)?;
            report::write_removed(out, &removed)?;
        }
        Action::List => {
            let totals = ledger.list_projects()?;
            report::write_project_list(out, &totals)?;
        }
        Action::Init => {
            let status = ledger.initialize()?;
            report::write_init(out, status, &config.db_path)?;
        }
        Action::Backup(dest) => {
            ledger.backup(&dest)?;
            report::write_backup(out, &dest)?;
        }
        Action::AddHours {
            project,
            hours,
            date,
        } => {
            let (project, entry) = ledger.add_hours(&project, hours, date.as_deref())?;
            report::write_added(out, &project, &entry)?;
        }
        Action::Show(name) => {
            let project_report = ledger.show_project(&name)?;
            report::write_project_report(out, &project_report, &config.currency)?;
        }
    }

    Ok(())
}
