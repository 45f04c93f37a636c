//! Shared test utilities.
//!
//! Helpers for building records with sensible defaults and for standing up a
//! store or a full router over an in-memory repository.

#![allow(clippy::unwrap_used)]

use crate::{
    api::{AppState, build_router},
    clock::FixedClock,
    config::AppConfig,
    core::schedule,
    entities::{EquipmentRecord, FieldValue},
    errors::Result,
    store::{InMemoryRepository, RecordStore},
};
use axum::Router;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Routes tracing output through the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Shorthand for a calendar date. Panics on an invalid date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates a record with a maintenance schedule.
///
/// # Arguments
/// * `sin` - Record identifier
/// * `last` - Last maintenance date, if any
/// * `cycle` - Maintenance cycle in years
///
/// The next maintenance date is derived the same way a write would derive it.
pub fn record_with_schedule(sin: &str, last: Option<NaiveDate>, cycle: i64) -> EquipmentRecord {
    let mut record = EquipmentRecord::new(sin);
    record.last_maintenance_date = last.into();
    record.cycle = Some(FieldValue::integer(cycle));
    #[allow(clippy::cast_precision_loss)]
    let years = cycle as f64;
    record.next_maintenance_date = schedule::compute_next_maintenance_date(last, years).into();
    record
}

/// Creates an unscheduled record with a voltage class.
pub fn record_with_voltage(sin: &str, voltage: &str) -> EquipmentRecord {
    let mut record = EquipmentRecord::new(sin);
    record.voltage = Some(FieldValue::text(voltage));
    record
}

/// Creates an unscheduled record with an equipment type.
pub fn record_with_type(sin: &str, equipment_type: &str) -> EquipmentRecord {
    let mut record = EquipmentRecord::new(sin);
    record.equipment_type = Some(FieldValue::text(equipment_type));
    record
}

/// Identifiers of `records`, in order.
pub fn sins<'a>(records: &[&'a EquipmentRecord]) -> Vec<&'a str> {
    records.iter().map(|r| r.sin.as_str()).collect()
}

/// Opens a store over an in-memory repository seeded with `records`.
///
/// The repository is returned too so tests can inspect what was persisted or
/// make saves fail.
pub async fn setup_store(
    records: Vec<EquipmentRecord>,
) -> Result<(RecordStore, Arc<InMemoryRepository>)> {
    init_test_tracing();
    let repo = Arc::new(InMemoryRepository::with_records(records));
    let shared: Arc<InMemoryRepository> = Arc::clone(&repo);
    let store = RecordStore::open(shared).await?;
    Ok((store, repo))
}

/// Builds the full router over an in-memory repository with a fixed "today".
pub async fn setup_app(
    records: Vec<EquipmentRecord>,
    today: NaiveDate,
) -> Result<(Router, Arc<InMemoryRepository>)> {
    let (store, repo) = setup_store(records).await?;
    let state = AppState {
        store: Arc::new(store),
        clock: Arc::new(FixedClock(today)),
        config: Arc::new(AppConfig::default()),
    };
    Ok((build_router(state), repo))
}
