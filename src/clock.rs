//! Source of "today" for report and status computations.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Provides the reference date reports are computed against.
pub trait Clock: Send + Sync {
    /// Today's calendar date.
    fn today(&self) -> NaiveDate;

    /// Current instant, used to stamp exported file names.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Local wall-clock date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same date; `now_utc` is midnight UTC on that date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.0.and_time(chrono::NaiveTime::MIN).and_utc()
    }
}
