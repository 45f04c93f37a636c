//! Record filter predicates used by the reporting views.
//!
//! Each predicate is independent; [`RecordFilter`] combines any subset of
//! them with logical AND. Selections use the sentinel `"All"` to mean "do not
//! filter on this field".

use crate::entities::EquipmentRecord;
use chrono::NaiveDate;

/// Sentinel selection value meaning "no filtering".
pub const ALL: &str = "All";

/// A drop-down style selection: either everything or one exact value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Pass-through
    #[default]
    All,
    /// Keep only records whose field equals this value
    Only(String),
}

impl Selection {
    /// Parses a query/form value. Missing, empty, and `"All"` all mean [`Selection::All`].
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("" | ALL) => Self::All,
            Some(value) => Self::Only(value.to_string()),
        }
    }

    /// The selected value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Only(v) => Some(v),
        }
    }
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day included
    pub start: NaiveDate,
    /// Last day included (through end of day)
    pub end: NaiveDate,
}

impl DateRange {
    /// Builds a range only when both bounds are present.
    #[must_use]
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        Some(Self {
            start: start?,
            end: end?,
        })
    }

    /// True when `date` falls within the range, both ends inclusive.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Removes the first case-insensitive `kV` unit and any whitespace before it.
///
/// `"11 kV"` and `"33kV"` become `"11"` and `"33"`.
#[must_use]
pub fn strip_voltage_unit(raw: &str) -> String {
    let lowered = raw.to_ascii_lowercase();
    match lowered.find("kv") {
        Some(idx) => {
            let prefix = raw[..idx].trim_end();
            format!("{prefix}{}", &raw[idx + 2..])
        }
        None => raw.to_string(),
    }
}

/// Exact match on equipment type.
#[must_use]
pub fn matches_type(record: &EquipmentRecord, selection: &Selection) -> bool {
    selection.value().is_none_or(|wanted| {
        record
            .equipment_type
            .as_ref()
            .is_some_and(|t| t.to_string() == wanted)
    })
}

/// Match on voltage class after stripping the unit suffix from the record's value.
#[must_use]
pub fn matches_voltage(record: &EquipmentRecord, selection: &Selection) -> bool {
    selection.value().is_none_or(|wanted| {
        record
            .voltage
            .as_ref()
            .is_some_and(|v| strip_voltage_unit(&v.to_string()) == wanted)
    })
}

/// String-equality match on the cycle value as it is stored.
#[must_use]
pub fn matches_cycle(record: &EquipmentRecord, selection: &Selection) -> bool {
    selection.value().is_none_or(|wanted| {
        record
            .cycle
            .as_ref()
            .is_some_and(|c| c.to_string() == wanted)
    })
}

/// Match on last maintenance date within an inclusive range.
///
/// Records with no last maintenance date never match a range.
#[must_use]
pub fn matches_date_range(record: &EquipmentRecord, range: Option<&DateRange>) -> bool {
    range.is_none_or(|r| record.last_maintenance_date.date().is_some_and(|d| r.contains(d)))
}

/// Case-insensitive exact match on the identifier. Surrounding whitespace in
/// the query is ignored.
#[must_use]
pub fn matches_sin(record: &EquipmentRecord, query: &str) -> bool {
    record.sin.to_lowercase() == query.trim().to_lowercase()
}

/// Filters by type; `"All"` passes everything through.
#[must_use]
pub fn filter_by_type<'a>(
    records: &[&'a EquipmentRecord],
    selection: &Selection,
) -> Vec<&'a EquipmentRecord> {
    records
        .iter()
        .copied()
        .filter(|r| matches_type(r, selection))
        .collect()
}

/// Filters by voltage class; `"All"` passes everything through.
#[must_use]
pub fn filter_by_voltage<'a>(
    records: &[&'a EquipmentRecord],
    selection: &Selection,
) -> Vec<&'a EquipmentRecord> {
    records
        .iter()
        .copied()
        .filter(|r| matches_voltage(r, selection))
        .collect()
}

/// Filters by cycle; `"All"` passes everything through.
#[must_use]
pub fn filter_by_cycle<'a>(
    records: &[&'a EquipmentRecord],
    selection: &Selection,
) -> Vec<&'a EquipmentRecord> {
    records
        .iter()
        .copied()
        .filter(|r| matches_cycle(r, selection))
        .collect()
}

/// Filters by last maintenance date. Unless both bounds are given the input
/// is returned unchanged.
#[must_use]
pub fn filter_by_date_range<'a>(
    records: &[&'a EquipmentRecord],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<&'a EquipmentRecord> {
    let range = DateRange::from_bounds(start, end);
    records
        .iter()
        .copied()
        .filter(|r| matches_date_range(r, range.as_ref()))
        .collect()
}

/// Filters by identifier, case-insensitively.
#[must_use]
pub fn filter_by_sin<'a>(records: &[&'a EquipmentRecord], query: &str) -> Vec<&'a EquipmentRecord> {
    records
        .iter()
        .copied()
        .filter(|r| matches_sin(r, query))
        .collect()
}

/// Conjunction of all filter predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Equipment type selection
    pub equipment_type: Selection,
    /// Voltage class selection (unit-less, e.g. "11")
    pub voltage: Selection,
    /// Cycle selection
    pub cycle: Selection,
    /// Last-maintenance date range
    pub date_range: Option<DateRange>,
    /// Identifier query
    pub sin: Option<String>,
}

impl RecordFilter {
    /// True when `record` satisfies every configured predicate.
    #[must_use]
    pub fn matches(&self, record: &EquipmentRecord) -> bool {
        matches_date_range(record, self.date_range.as_ref())
            && matches_type(record, &self.equipment_type)
            && matches_voltage(record, &self.voltage)
            && matches_cycle(record, &self.cycle)
            && self.sin.as_deref().is_none_or(|q| matches_sin(record, q))
    }

    /// Keeps the records that match, preserving input order.
    pub fn apply<'a, I>(&self, records: I) -> Vec<&'a EquipmentRecord>
    where
        I: IntoIterator<Item = &'a EquipmentRecord>,
    {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}
