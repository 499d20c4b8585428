//! Core library surface for the time-tracking ledger: a SQLite store of
//! projects and dated hour entries, plus the reports built from them.
//!
//! The binary only parses arguments and prints; everything it does goes
//! through [`Ledger`], which receives its store location, clock and
//! confirmation prompt explicitly so the same operations run unchanged in
//! tests.
pub mod cli;
pub mod clock;
pub mod config;
pub mod confirm;
pub mod db;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod report;

/// The store handle and the operations built on top of it.
pub use db::Store;
pub use ledger::Ledger;

/// Injected capabilities.
pub use clock::{Clock, FixedClock, SystemClock};
pub use confirm::{AlwaysConfirm, Confirm, PromptConfirm};

pub use config::{Config, RemovalPolicy};
pub use error::{ledger_error, LedgerError};
pub use models::{HourEntry, InitStatus, Project, ProjectReport, ProjectTotal, RemovedProject};
