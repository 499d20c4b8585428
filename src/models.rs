//! Domain models that mirror the SQLite schema. These stay light-weight data
//! holders so the ledger can focus on transactions and the report module on
//! presentation.

use std::fmt;

use chrono::NaiveDate;

use crate::error::LedgerError;

/// Dates are stored and printed as ISO `YYYY-MM-DD`.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
/// A named unit of tracked work. `salary` and `allocated` are only meaningful
/// together, see [`ProjectReport::average_rate`].
pub struct Project {
    /// Primary key assigned by SQLite on insert.
    pub id: i64,
    /// Lower-cased project name, unique across the store.
    pub name: String,
    /// Pay for the fully allocated hour budget, in the configured currency.
    pub salary: Option<f64>,
    /// Total hours budgeted for the project.
    pub allocated: Option<i64>,
}

impl fmt::Display for Project {
    /// The stored, lower-cased name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One dated record of hours logged against a project.
pub struct HourEntry {
    pub id: i64,
    pub project_id: i64,
    pub date: NaiveDate,
    /// Logged hours. Negative values are stored as given and act as
    /// corrections in every sum.
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A row of the project listing: name plus the sum of every entry.
pub struct ProjectTotal {
    pub name: String,
    pub total_hours: i64,
}

#[derive(Debug, Clone, PartialEq)]
/// Everything `show_project` knows about a single project.
pub struct ProjectReport {
    pub project: Project,
    /// Sum over all entries, `0` when nothing has been logged.
    pub total_hours: i64,
    /// Entries ordered by date, then insertion order.
    pub entries: Vec<HourEntry>,
    /// `allocated * salary / total_hours`, present only when both project
    /// fields are set and at least one net hour has been logged.
    pub average_rate: Option<f64>,
}

impl ProjectReport {
    /// Fails with [`LedgerError::HoursOverflow`] when the entries do not sum
    /// to a value an `i64` can hold.
    pub fn new(project: Project, entries: Vec<HourEntry>) -> Result<Self, LedgerError> {
        let total_hours = entries
            .iter()
            .try_fold(0i64, |total, entry| total.checked_add(entry.amount))
            .ok_or_else(|| LedgerError::HoursOverflow(project.name.clone()))?;
        let average_rate = average_rate(project.allocated, project.salary, total_hours);
        Ok(Self {
            project,
            total_hours,
            entries,
            average_rate,
        })
    }
}

/// The effective hourly value of a project: the whole budget
/// (`allocated * salary`) spread over the hours actually worked.
pub fn average_rate(allocated: Option<i64>, salary: Option<f64>, total_hours: i64) -> Option<f64> {
    match (allocated, salary) {
        (Some(allocated), Some(salary)) if total_hours != 0 => {
            Some(allocated as f64 * salary / total_hours as f64)
        }
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of [`crate::db::Store::initialize`]. An existing store is reported,
/// never treated as a failure.
pub enum InitStatus {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What a successful `remove_project` took with it.
pub struct RemovedProject {
    pub name: String,
    pub entries_removed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(salary: Option<f64>, allocated: Option<i64>) -> Project {
        Project {
            id: 1,
            name: "thesis".to_string(),
            salary,
            allocated,
        }
    }

    fn entry(id: i64, amount: i64) -> HourEntry {
        HourEntry {
            id,
            project_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, id as u32).unwrap(),
            amount,
        }
    }

    #[test]
    fn average_rate_spreads_budget_over_worked_hours() {
        assert_eq!(average_rate(Some(100), Some(50.0), 25), Some(200.0));
    }

    #[test]
    fn average_rate_needs_both_fields_and_hours() {
        assert_eq!(average_rate(Some(100), Some(50.0), 0), None);
        assert_eq!(average_rate(None, Some(50.0), 10), None);
        assert_eq!(average_rate(Some(100), None, 10), None);
    }

    #[test]
    fn report_sums_entries_including_corrections() {
        let report = ProjectReport::new(
            project(Some(50.0), Some(100)),
            vec![entry(1, 3), entry(2, 5), entry(3, -1)],
        )
        .unwrap();
        assert_eq!(report.total_hours, 7);
        assert_eq!(report.average_rate, Some(100.0 * 50.0 / 7.0));
    }

    #[test]
    fn report_without_entries_has_zero_total_and_no_rate() {
        let report = ProjectReport::new(project(Some(50.0), Some(100)), Vec::new()).unwrap();
        assert_eq!(report.total_hours, 0);
        assert_eq!(report.average_rate, None);
    }

    #[test]
    fn report_rejects_totals_past_i64() {
        let err = ProjectReport::new(
            project(None, None),
            vec![entry(1, i64::MAX), entry(2, 1)],
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::HoursOverflow("thesis".to_string()));
    }

    #[test]
    fn report_accepts_totals_that_come_back_in_range() {
        let report = ProjectReport::new(
            project(None, None),
            vec![entry(1, i64::MAX), entry(2, -1)],
        )
        .unwrap();
        assert_eq!(report.total_hours, i64::MAX - 1);
    }
}
