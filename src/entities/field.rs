//! Loosely-typed record field values and the serde helpers that read them.
//!
//! The persisted document is hand-edited as often as it is written by the
//! API, so descriptive fields may hold either strings or numbers and dates may
//! be empty strings. These helpers accept what the document contains without
//! rewriting values that were already valid.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Calendar date format used on the wire and on disk.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A scalar field that may arrive as text or as a JSON number.
///
/// The original representation is kept so the document round-trips exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A JSON number, e.g. `"Cycle": 5`
    Number(serde_json::Number),
    /// A JSON string, e.g. `"Cycle": "5"`
    Text(String),
}

impl FieldValue {
    /// Builds a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Builds a numeric value from an integer.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::Number(value.into())
    }

    /// Coerces the value to a finite number.
    ///
    /// Numeric-looking strings (surrounding whitespace allowed) are parsed;
    /// empty or non-numeric text yields `None`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => n.as_f64()?,
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok()?
            }
        };
        value.is_finite().then_some(value)
    }

    /// True for the empty string.
    #[must_use]
    pub const fn is_empty_text(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    /// True for values that a form treats as "nothing entered": the empty
    /// string and numeric zero.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Number(n) => n.as_f64().is_none_or(|v| v == 0.0),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Parses a calendar date from `YYYY-MM-DD`, `YYYY/MM/DD`, or a full RFC 3339
/// timestamp.
///
/// Time-of-day is discarded (timestamps are converted to UTC first). Empty or
/// unparseable input yields `None`.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y/%m/%d"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}

/// A stored date field.
///
/// The value is kept exactly as it was read (a date string, an empty string,
/// `null`, or anything a hand edit left behind) and written back unchanged, so
/// rewriting the document never loses data. Scheduling and reports only see
/// the parsed calendar date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DateField {
    raw: serde_json::Value,
    parsed: Option<NaiveDate>,
}

impl DateField {
    /// An absent date, stored as `null`.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            raw: serde_json::Value::Null,
            parsed: None,
        }
    }

    /// Wraps a stored value, parsing it when it is a date string.
    #[must_use]
    pub fn from_raw(raw: serde_json::Value) -> Self {
        let parsed = match &raw {
            serde_json::Value::String(s) => {
                let parsed = parse_date(s);
                if parsed.is_none() && !s.trim().is_empty() {
                    tracing::warn!("Keeping unparseable date value {:?} as stored", s);
                }
                parsed
            }
            _ => None,
        };
        Self { raw, parsed }
    }

    /// The calendar date, if the stored value parses as one.
    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        self.parsed
    }

    /// The value as stored.
    #[must_use]
    pub const fn raw(&self) -> &serde_json::Value {
        &self.raw
    }
}

impl From<Option<NaiveDate>> for DateField {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map_or_else(Self::empty, |d| Self {
            raw: serde_json::Value::String(d.format(DATE_FORMAT).to_string()),
            parsed: Some(d),
        })
    }
}

impl From<NaiveDate> for DateField {
    fn from(date: NaiveDate) -> Self {
        Self::from(Some(date))
    }
}

impl Serialize for DateField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DateField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Self::from_raw)
    }
}

/// Reads a flag that forms submit either as a JSON boolean or as `"true"`.
///
/// Anything other than `true` / `"true"` is `false`.
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::String(s)) => s == "true",
        _ => false,
    })
}
