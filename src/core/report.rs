//! Report generation business logic.
//!
//! This module computes the dashboard summary counts and the filtered report
//! views (due, next-month window, identifier search, date-range search). All
//! functions are pure: they take the record collection and an explicit
//! reference date, and return structured data the API layer serializes.

use super::{
    display,
    filter::{DateRange, RecordFilter, Selection},
    schedule::{self, MaintenanceStatus},
};
use crate::{
    entities::EquipmentRecord,
    errors::{Error, Result},
};
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

/// Summary counts shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCounts {
    /// Number of records in the collection
    pub total_records: usize,
    /// Records whose next maintenance date has been reached
    pub maintenance_due: usize,
    /// Records falling due after today and by the end of next month
    pub next_month_due: usize,
}

/// Last day of the calendar month after `reference`'s month.
///
/// The "next month" window therefore covers the rest of the current month
/// plus all of the following month.
#[must_use]
pub fn next_month_window_end(reference: NaiveDate) -> NaiveDate {
    reference
        .with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(2)))
        .and_then(|after| after.checked_sub_days(Days::new(1)))
        .unwrap_or(NaiveDate::MAX)
}

/// True when the record has a next maintenance date on or before `reference`.
#[must_use]
pub fn is_maintenance_due(record: &EquipmentRecord, reference: NaiveDate) -> bool {
    record
        .next_maintenance_date
        .date()
        .is_some_and(|next| reference >= next)
}

/// True when the record falls due strictly after `reference` and no later
/// than the end of the next calendar month.
#[must_use]
pub fn is_due_next_month(record: &EquipmentRecord, reference: NaiveDate) -> bool {
    let window_end = next_month_window_end(reference);
    record
        .next_maintenance_date
        .date()
        .is_some_and(|next| next > reference && next <= window_end)
}

/// Computes the dashboard summary.
#[must_use]
pub fn summarize(records: &[EquipmentRecord], reference: NaiveDate) -> SummaryCounts {
    SummaryCounts {
        total_records: records.len(),
        maintenance_due: records
            .iter()
            .filter(|r| is_maintenance_due(r, reference))
            .count(),
        next_month_due: records
            .iter()
            .filter(|r| is_due_next_month(r, reference))
            .count(),
    }
}

/// Which report view to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportKind {
    /// Records whose maintenance is due or overdue
    Due,
    /// Records falling due within the next-month window
    NextMonth,
    /// Case-insensitive identifier lookup
    Search {
        /// Identifier query
        sin: String,
    },
    /// Records last maintained within a date range, optionally by cycle
    DateRange {
        /// Start bound (required)
        start: Option<NaiveDate>,
        /// End bound (required)
        end: Option<NaiveDate>,
        /// Cycle selection
        cycle: Selection,
    },
}

/// A report request: the view plus the type/voltage selections every view
/// is intersected with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    /// Report view
    pub kind: ReportKind,
    /// Equipment type selection
    pub equipment_type: Selection,
    /// Voltage class selection
    pub voltage: Selection,
}

impl ReportRequest {
    /// A request for `kind` with no type or voltage filtering.
    #[must_use]
    pub const fn new(kind: ReportKind) -> Self {
        Self {
            kind,
            equipment_type: Selection::All,
            voltage: Selection::All,
        }
    }

    /// Builds the combined filter, validating required inputs.
    fn to_filter(&self) -> Result<RecordFilter> {
        let mut filter = RecordFilter {
            equipment_type: self.equipment_type.clone(),
            voltage: self.voltage.clone(),
            ..RecordFilter::default()
        };

        match &self.kind {
            ReportKind::Due | ReportKind::NextMonth => {}
            ReportKind::Search { sin } => {
                if sin.trim().is_empty() {
                    return Err(Error::invalid_input("A SIN to search for is required"));
                }
                filter.sin = Some(sin.clone());
            }
            ReportKind::DateRange { start, end, cycle } => {
                let range = DateRange::from_bounds(*start, *end).ok_or_else(|| {
                    Error::invalid_input("Please select both a start date and an end date")
                })?;
                if range.start > range.end {
                    return Err(Error::invalid_input("Start date must be before end date"));
                }
                filter.date_range = Some(range);
                filter.cycle = cycle.clone();
            }
        }

        Ok(filter)
    }
}

/// One report row: the record plus its classified maintenance status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    /// The matching record
    pub record: EquipmentRecord,
    /// Maintenance status at the report's reference date
    pub status: MaintenanceStatus,
    /// Human-readable status line
    pub status_text: String,
    /// Label/value pairs for the record's detail card
    pub details: Vec<(&'static str, String)>,
}

/// The result of running a report. An empty report is a normal outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Date the report was computed against
    pub reference_date: NaiveDate,
    /// Matching records in collection order
    pub records: Vec<EquipmentRecord>,
}

impl Report {
    /// Number of matching records.
    #[must_use]
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// True when nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Report rows with status classification.
    #[must_use]
    pub fn entries(&self) -> Vec<ReportEntry> {
        self.records
            .iter()
            .map(|record| {
                let status =
                    schedule::classify_status(record.next_maintenance_date.date(), self.reference_date);
                ReportEntry {
                    record: record.clone(),
                    status,
                    status_text: display::status_text(status),
                    details: display::record_lines(record),
                }
            })
            .collect()
    }
}

/// Runs a report over the collection.
///
/// Returns [`Error::InvalidInput`] when a search has no query, or when a
/// date-range report is missing a bound or has its bounds reversed.
pub fn run_report(
    records: &[EquipmentRecord],
    request: &ReportRequest,
    reference: NaiveDate,
) -> Result<Report> {
    let filter = request.to_filter()?;
    let window: fn(&EquipmentRecord, NaiveDate) -> bool = match request.kind {
        ReportKind::Due => is_maintenance_due,
        ReportKind::NextMonth => is_due_next_month,
        ReportKind::Search { .. } | ReportKind::DateRange { .. } => |_, _| true,
    };

    let matching = records
        .iter()
        .filter(|r| window(r, reference) && filter.matches(r))
        .cloned()
        .collect();

    Ok(Report {
        reference_date: reference,
        records: matching,
    })
}

/// Records due for maintenance, intersected with type/voltage selections.
#[must_use]
pub fn due_report(
    records: &[EquipmentRecord],
    equipment_type: Selection,
    voltage: Selection,
    reference: NaiveDate,
) -> Report {
    window_report(records, ReportKind::Due, equipment_type, voltage, reference)
}

/// Records due within the next-month window, intersected with type/voltage
/// selections.
#[must_use]
pub fn next_month_report(
    records: &[EquipmentRecord],
    equipment_type: Selection,
    voltage: Selection,
    reference: NaiveDate,
) -> Report {
    window_report(
        records,
        ReportKind::NextMonth,
        equipment_type,
        voltage,
        reference,
    )
}

fn window_report(
    records: &[EquipmentRecord],
    kind: ReportKind,
    equipment_type: Selection,
    voltage: Selection,
    reference: NaiveDate,
) -> Report {
    let request = ReportRequest {
        kind,
        equipment_type,
        voltage,
    };
    // Window views take no required inputs, so building the filter cannot fail.
    run_report(records, &request, reference).unwrap_or_else(|_| Report {
        reference_date: reference,
        records: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn with_next(sin: &str, next: Option<NaiveDate>) -> EquipmentRecord {
        let mut record = EquipmentRecord::new(sin);
        record.next_maintenance_date = next.into();
        record
    }

    #[test]
    fn test_window_end_is_last_day_of_following_month() {
        assert_eq!(next_month_window_end(date(2024, 1, 15)), date(2024, 2, 29));
        assert_eq!(next_month_window_end(date(2023, 1, 31)), date(2023, 2, 28));
        assert_eq!(next_month_window_end(date(2024, 11, 3)), date(2024, 12, 31));
        assert_eq!(next_month_window_end(date(2024, 12, 31)), date(2025, 1, 31));
    }

    #[test]
    fn test_next_month_window_boundaries() {
        let today = date(2024, 1, 15);
        assert!(is_due_next_month(&with_next("a", Some(date(2024, 2, 29))), today));
        assert!(!is_due_next_month(&with_next("b", Some(date(2024, 3, 1))), today));
        assert!(!is_due_next_month(&with_next("c", Some(today)), today));
        assert!(is_due_next_month(&with_next("d", Some(date(2024, 1, 16))), today));
        assert!(!is_due_next_month(&with_next("e", None), today));
    }

    #[test]
    fn test_day_of_counts_as_due() {
        let today = date(2024, 1, 15);
        assert!(is_maintenance_due(&with_next("a", Some(today)), today));
        assert!(is_maintenance_due(&with_next("b", Some(date(2023, 6, 1))), today));
        assert!(!is_maintenance_due(&with_next("c", Some(date(2024, 1, 16))), today));
        assert!(!is_maintenance_due(&with_next("d", None), today));
    }

    #[test]
    fn test_summarize_counts() {
        let today = date(2024, 1, 15);
        let records = vec![
            with_next("I1", Some(date(2024, 1, 15))),
            with_next("I2", Some(date(2023, 12, 1))),
            with_next("I3", Some(date(2024, 2, 10))),
            with_next("I4", Some(date(2024, 6, 1))),
            with_next("I5", None),
        ];

        let summary = summarize(&records, today);
        assert_eq!(
            summary,
            SummaryCounts {
                total_records: 5,
                maintenance_due: 2,
                next_month_due: 1,
            }
        );
    }

    #[test]
    fn test_summarize_empty_collection() {
        let summary = summarize(&[], date(2024, 1, 15));
        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.maintenance_due, 0);
        assert_eq!(summary.next_month_due, 0);
    }

    #[test]
    fn test_due_report_intersects_type_and_voltage() {
        let today = date(2024, 1, 15);
        let mut a = record_with_voltage("I1", "11 kV");
        a.equipment_type = Some("Pole Mounted".into());
        a.next_maintenance_date = date(2024, 1, 1).into();
        let mut b = record_with_voltage("I2", "33 kV");
        b.equipment_type = Some("Pole Mounted".into());
        b.next_maintenance_date = date(2024, 1, 1).into();
        let mut c = record_with_voltage("I3", "11 kV");
        c.equipment_type = Some("Pole Mounted".into());
        c.next_maintenance_date = date(2024, 5, 1).into();

        let report = due_report(
            &[a, b, c],
            Selection::parse(Some("Pole Mounted")),
            Selection::parse(Some("11")),
            today,
        );
        assert_eq!(report.count(), 1);
        assert_eq!(report.records[0].sin, "I1");
    }

    #[test]
    fn test_next_month_report_empty_is_not_an_error() {
        let today = date(2024, 1, 15);
        let records = vec![with_next("I1", Some(date(2025, 1, 1)))];
        let report = next_month_report(&records, Selection::All, Selection::All, today);
        assert!(report.is_empty());
        assert_eq!(report.count(), 0);
    }

    #[test]
    fn test_window_reports_match_run_report() -> Result<()> {
        let today = date(2024, 1, 15);
        let mut records = vec![
            with_next("I1", Some(date(2024, 1, 15))),
            with_next("I2", Some(date(2024, 2, 1))),
            with_next("I3", Some(date(2024, 2, 20))),
            with_next("I4", None),
        ];
        records[1].voltage = Some("33 kV".into());
        let voltage = Selection::parse(Some("33"));

        let due = due_report(&records, Selection::All, Selection::All, today);
        let via_request = run_report(&records, &ReportRequest::new(ReportKind::Due), today)?;
        assert_eq!(due, via_request);
        assert_eq!(due.records[0].sin, "I1");

        let next = next_month_report(&records, Selection::All, voltage.clone(), today);
        let request = ReportRequest {
            voltage,
            ..ReportRequest::new(ReportKind::NextMonth)
        };
        assert_eq!(next, run_report(&records, &request, today)?);
        assert_eq!(next.count(), 1);
        assert_eq!(next.records[0].sin, "I2");
        Ok(())
    }

    #[test]
    fn test_run_report_search() -> Result<()> {
        let records = vec![with_next("I0001", None), with_next("I0002", None)];
        let request = ReportRequest::new(ReportKind::Search {
            sin: "i0002".to_string(),
        });
        let report = run_report(&records, &request, date(2024, 1, 15))?;
        assert_eq!(report.count(), 1);
        assert_eq!(report.records[0].sin, "I0002");
        Ok(())
    }

    #[test]
    fn test_run_report_search_requires_query() {
        let request = ReportRequest::new(ReportKind::Search {
            sin: "  ".to_string(),
        });
        let result = run_report(&[], &request, date(2024, 1, 15));
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_run_report_date_range_requires_both_bounds() {
        let request = ReportRequest::new(ReportKind::DateRange {
            start: Some(date(2024, 1, 1)),
            end: None,
            cycle: Selection::All,
        });
        let result = run_report(&[], &request, date(2024, 1, 15));
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_run_report_date_range_rejects_reversed_bounds() {
        let request = ReportRequest::new(ReportKind::DateRange {
            start: Some(date(2024, 2, 1)),
            end: Some(date(2024, 1, 1)),
            cycle: Selection::All,
        });
        let result = run_report(&[], &request, date(2024, 1, 15));
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_run_report_date_range_with_cycle() -> Result<()> {
        let records = vec![
            record_with_schedule("I1", Some(date(2023, 5, 1)), 1),
            record_with_schedule("I2", Some(date(2023, 5, 2)), 2),
            record_with_schedule("I3", Some(date(2022, 5, 2)), 1),
        ];
        let request = ReportRequest::new(ReportKind::DateRange {
            start: Some(date(2023, 1, 1)),
            end: Some(date(2023, 12, 31)),
            cycle: Selection::parse(Some("1")),
        });
        let report = run_report(&records, &request, date(2024, 1, 15))?;
        assert_eq!(report.count(), 1);
        assert_eq!(report.records[0].sin, "I1");
        Ok(())
    }

    #[test]
    fn test_report_entries_carry_status() -> Result<()> {
        let today = date(2024, 1, 15);
        let records = vec![
            with_next("I1", Some(date(2024, 1, 10))),
            with_next("I2", Some(date(2024, 1, 25))),
        ];
        let request = ReportRequest::new(ReportKind::DateRange {
            start: None,
            end: None,
            cycle: Selection::All,
        });
        assert!(run_report(&records, &request, today).is_err());

        let report = Report {
            reference_date: today,
            records,
        };
        let entries = report.entries();
        assert_eq!(entries[0].status, MaintenanceStatus::Overdue { days: 5 });
        assert_eq!(entries[0].status_text, "Status: Overdue by 5 days");
        assert_eq!(entries[1].status, MaintenanceStatus::DueIn { days: 10 });
        assert_eq!(entries[1].status_text, "Status: Due in 10 days");
        Ok(())
    }
}
