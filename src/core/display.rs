//! Human-readable formatting for records and maintenance statuses.

use super::schedule::MaintenanceStatus;
use crate::entities::{EquipmentRecord, FieldValue};
use chrono::NaiveDate;

/// Placeholder shown for absent values.
pub const NOT_APPLICABLE: &str = "N/A";

/// Formats a date as `January 5, 2024`, or `N/A` when absent.
#[must_use]
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(
        || NOT_APPLICABLE.to_string(),
        |d| d.format("%B %-d, %Y").to_string(),
    )
}

/// Renders an optional reading, or `N/A` when absent or blank.
#[must_use]
pub fn value_or_na(value: Option<&FieldValue>) -> String {
    match value {
        Some(v) if !v.is_blank() => v.to_string(),
        _ => NOT_APPLICABLE.to_string(),
    }
}

/// Renders the new-substation flag.
#[must_use]
pub const fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// The status line shown under each report row.
#[must_use]
pub fn status_text(status: MaintenanceStatus) -> String {
    match status {
        MaintenanceStatus::NeverMaintained => "Status: Never maintained".to_string(),
        MaintenanceStatus::Overdue { days: 0 } => "Status: Due today".to_string(),
        MaintenanceStatus::Overdue { days } => format!("Status: Overdue by {days} days"),
        MaintenanceStatus::DueIn { days } => format!("Status: Due in {days} days"),
    }
}

/// Label/value pairs for a record's detail card, in display order.
#[must_use]
pub fn record_lines(record: &EquipmentRecord) -> Vec<(&'static str, String)> {
    let text = |v: Option<&FieldValue>| v.map(ToString::to_string).unwrap_or_default();
    vec![
        ("SIN", record.sin.clone()),
        ("Feeder Id", text(record.feeder_id.as_ref())),
        ("Substation Name", text(record.substation_name.as_ref())),
        ("Type", text(record.equipment_type.as_ref())),
        ("Capacity", format!("{} kVA", text(record.capacity.as_ref()))),
        ("kV", text(record.voltage.as_ref())),
        ("Last Maintenance Date", format_date(record.last_maintenance_date.date())),
        ("Next Maintenance Date", format_date(record.next_maintenance_date.date())),
        (
            "SurgeAr Resistance",
            value_or_na(record.surge_arrester_resistance.as_ref()),
        ),
        ("Nutrel Resistance", value_or_na(record.neutral_resistance.as_ref())),
        ("IR HT-LT", value_or_na(record.ir_ht_lt.as_ref())),
        ("IR HT-BODY", value_or_na(record.ir_ht_body.as_ref())),
        ("IR LT-BODY", value_or_na(record.ir_lt_body.as_ref())),
        ("New Substation", yes_no(record.is_new_substation).to_string()),
        (
            "Maintenance Cycle",
            format!("{} years", text(record.cycle.as_ref())),
        ),
    ]
}
