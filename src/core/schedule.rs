//! Maintenance scheduling logic.
//!
//! Computes the next maintenance date from the last one and the cycle length,
//! and classifies a record's maintenance status against an explicit reference
//! date. Nothing in here reads the wall clock; callers pass "today" in.

use crate::entities::EquipmentRecord;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Days per maintenance year. Leap years are deliberately not accounted for.
pub const DAYS_PER_CYCLE_YEAR: f64 = 365.0;

/// Maintenance status of a record relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MaintenanceStatus {
    /// No last maintenance date, so no next date either
    NeverMaintained,
    /// The next maintenance date has been reached (`days` = 0 on the day itself)
    Overdue {
        /// Days elapsed since the next maintenance date
        days: i64,
    },
    /// The next maintenance date is still in the future
    DueIn {
        /// Days remaining until the next maintenance date
        days: i64,
    },
}

impl MaintenanceStatus {
    /// True when maintenance is due on or before the reference date.
    #[must_use]
    pub const fn is_due(self) -> bool {
        matches!(self, Self::Overdue { .. })
    }
}

/// Computes the next maintenance date.
///
/// Returns `None` when `last_date` is absent, or when the cycle is negative or
/// not finite. Otherwise adds `cycle_years * 365` whole days (any fractional
/// day is truncated) to `last_date`.
#[must_use]
pub fn compute_next_maintenance_date(
    last_date: Option<NaiveDate>,
    cycle_years: f64,
) -> Option<NaiveDate> {
    let last = last_date?;
    if !cycle_years.is_finite() || cycle_years < 0.0 {
        return None;
    }

    // Cast safety: the product is finite and non-negative; values beyond the
    // representable date range fall out through `checked_add_signed`.
    #[allow(clippy::cast_possible_truncation)]
    let days = (cycle_years * DAYS_PER_CYCLE_YEAR).floor() as i64;
    last.checked_add_signed(Duration::try_days(days)?)
}

/// Computes the next maintenance date for a record from its own fields.
///
/// A missing or non-numeric cycle yields `None`.
#[must_use]
pub fn next_maintenance_date_for(record: &EquipmentRecord) -> Option<NaiveDate> {
    let cycle = record.cycle_years()?;
    compute_next_maintenance_date(record.last_maintenance_date.date(), cycle)
}

/// Classifies a record's maintenance status relative to `reference_date`.
///
/// Day-of counts as due: a next date equal to the reference date is
/// `Overdue { days: 0 }`, never `DueIn { days: 0 }`.
#[must_use]
pub fn classify_status(
    next_maintenance_date: Option<NaiveDate>,
    reference_date: NaiveDate,
) -> MaintenanceStatus {
    let Some(next) = next_maintenance_date else {
        return MaintenanceStatus::NeverMaintained;
    };

    let days_difference = next.signed_duration_since(reference_date).num_days();
    if days_difference <= 0 {
        MaintenanceStatus::Overdue {
            days: days_difference.abs(),
        }
    } else {
        MaintenanceStatus::DueIn {
            days: days_difference,
        }
    }
}
