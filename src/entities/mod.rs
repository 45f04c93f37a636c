//! Entity module - Contains the record types persisted in the record document.
//! `record` holds the equipment record itself; `field` holds the loosely-typed
//! scalar and date helpers its fields are built from.

pub mod field;
pub mod record;

pub use field::{DATE_FORMAT, DateField, FieldValue, parse_date};
pub use record::EquipmentRecord;
