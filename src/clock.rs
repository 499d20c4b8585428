//! Source of "today" for entries logged without an explicit date.

use chrono::{Local, NaiveDate};

pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// The local calendar date of the machine running the command.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always answers with the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
