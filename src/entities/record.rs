//! Equipment record entity - one feeder/substation asset and its maintenance data.
//!
//! Field names on the wire and on disk are the strings the data-entry forms
//! have always used (some contain spaces), so every field carries an explicit
//! serde rename. Fields the struct does not know about are kept in
//! [`EquipmentRecord::extra`] and written back after the known fields.

use super::field::{DateField, FieldValue, deserialize_flag};
use serde::{Deserialize, Serialize};

/// Equipment record as stored in the record document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    /// Unique asset tag (primary key)
    #[serde(rename = "SIN")]
    pub sin: String,
    /// Feeder the equipment hangs off
    #[serde(rename = "Feeder Id", default)]
    pub feeder_id: Option<FieldValue>,
    /// Substation name
    #[serde(rename = "Substation Name", default)]
    pub substation_name: Option<FieldValue>,
    /// Equipment type (e.g. "Pole Mounted")
    #[serde(rename = "Type", default)]
    pub equipment_type: Option<FieldValue>,
    /// Transformer capacity in kVA
    #[serde(rename = "Capacity", default)]
    pub capacity: Option<FieldValue>,
    /// Voltage class, usually with a unit suffix ("11 kV", "33kV")
    #[serde(rename = "kV", default)]
    pub voltage: Option<FieldValue>,
    /// Date maintenance was last carried out
    #[serde(rename = "LastMaintenanceDate", default)]
    pub last_maintenance_date: DateField,
    /// Derived from `last_maintenance_date` and `cycle`; recomputed on every write
    #[serde(rename = "NextMaintenanceDate", default)]
    pub next_maintenance_date: DateField,
    /// Surge arrester earth resistance reading
    #[serde(rename = "SurgeArResistance", default)]
    pub surge_arrester_resistance: Option<FieldValue>,
    /// Neutral earth resistance reading
    #[serde(rename = "NutrelResistance", default)]
    pub neutral_resistance: Option<FieldValue>,
    /// Maintenance interval in years (number or numeric string)
    #[serde(rename = "Cycle", default)]
    pub cycle: Option<FieldValue>,
    /// Insulation resistance, HT to LT
    #[serde(rename = "IR_HT_LT", default)]
    pub ir_ht_lt: Option<FieldValue>,
    /// Insulation resistance, HT to body
    #[serde(rename = "IR_HT_BODY", default)]
    pub ir_ht_body: Option<FieldValue>,
    /// Insulation resistance, LT to body
    #[serde(rename = "IR_LT_BODY", default)]
    pub ir_lt_body: Option<FieldValue>,
    /// Whether this is a newly commissioned substation
    #[serde(rename = "new_sub", default, deserialize_with = "deserialize_flag")]
    pub is_new_substation: bool,
    /// Fields not modelled above, preserved in document order
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EquipmentRecord {
    /// Creates a record with only an identifier set.
    pub fn new(sin: impl Into<String>) -> Self {
        Self {
            sin: sin.into(),
            feeder_id: None,
            substation_name: None,
            equipment_type: None,
            capacity: None,
            voltage: None,
            last_maintenance_date: DateField::empty(),
            next_maintenance_date: DateField::empty(),
            surge_arrester_resistance: None,
            neutral_resistance: None,
            cycle: None,
            ir_ht_lt: None,
            ir_ht_body: None,
            ir_lt_body: None,
            is_new_substation: false,
            extra: serde_json::Map::new(),
        }
    }

    /// Cycle length in years, coerced from a number or numeric string.
    #[must_use]
    pub fn cycle_years(&self) -> Option<f64> {
        self.cycle.as_ref().and_then(FieldValue::as_f64)
    }

    /// Serializes the record as a flat field map in document order.
    pub fn to_field_map(&self) -> serde_json::Result<serde_json::Map<String, serde_json::Value>> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "record serialized to non-object value: {other}"
            ))),
        }
    }
}
