//! Equipment record business logic - create, update, delete, and lookup.
//!
//! Every write normalises the incoming record (derived next maintenance date,
//! blank insulation readings) before handing it to the store, which persists
//! the whole collection. Identifier uniqueness is enforced here.

use super::schedule;
use crate::{
    entities::{EquipmentRecord, FieldValue},
    errors::{Error, Result},
    store::RecordStore,
};
use tracing::{info, instrument, warn};

/// Validates and normalises a record before it is stored.
///
/// - The identifier must not be blank.
/// - A cycle, when given, must be a non-negative number (numeric strings are
///   accepted); a last maintenance date requires a cycle.
/// - `NextMaintenanceDate` is recomputed from the last date and cycle.
/// - Empty insulation-resistance readings become absent.
pub fn normalize_record(record: &mut EquipmentRecord) -> Result<()> {
    if record.sin.trim().is_empty() {
        return Err(Error::invalid_input("SIN is required"));
    }

    let cycle = match record.cycle.as_ref() {
        None => None,
        Some(value) if value.is_empty_text() => None,
        Some(value) => match value.as_f64() {
            Some(years) if years >= 0.0 => Some(years),
            _ => {
                return Err(Error::invalid_input(format!(
                    "Cycle must be a non-negative number of years, got {value:?}"
                )));
            }
        },
    };

    let next = match (record.last_maintenance_date.date(), cycle) {
        (None, _) => None,
        (Some(_), None) => {
            return Err(Error::invalid_input(
                "Cycle is required when a last maintenance date is given",
            ));
        }
        (Some(last), Some(years)) => {
            let next = schedule::compute_next_maintenance_date(Some(last), years);
            if next.is_none() {
                return Err(Error::invalid_input(format!(
                    "Cycle of {years} years is out of range"
                )));
            }
            next
        }
    };
    record.next_maintenance_date = next.into();

    for reading in [
        &mut record.ir_ht_lt,
        &mut record.ir_ht_body,
        &mut record.ir_lt_body,
    ] {
        if reading.as_ref().is_some_and(FieldValue::is_empty_text) {
            *reading = None;
        }
    }

    Ok(())
}

/// Returns every record in stored order.
pub async fn list_records(store: &RecordStore) -> Vec<EquipmentRecord> {
    store.snapshot().await
}

/// Finds a record by exact identifier.
pub async fn get_record(store: &RecordStore, sin: &str) -> Result<EquipmentRecord> {
    store.get(sin).await.ok_or_else(|| Error::RecordNotFound {
        sin: sin.to_string(),
    })
}

/// Adds a new record.
///
/// Fails with [`Error::DuplicateSin`] if the identifier is taken; the
/// collection is left unchanged.
#[instrument(skip(store, record), fields(sin = %record.sin))]
pub async fn create_record(
    store: &RecordStore,
    mut record: EquipmentRecord,
) -> Result<EquipmentRecord> {
    normalize_record(&mut record)?;

    let created = store
        .mutate(|records| {
            if records.iter().any(|r| r.sin == record.sin) {
                return Err(Error::DuplicateSin {
                    sin: record.sin.clone(),
                });
            }
            records.push(record.clone());
            Ok(record)
        })
        .await?;

    info!("Created record {}", created.sin);
    Ok(created)
}

/// Replaces the record stored under `sin`.
///
/// The replacement may carry a different identifier. That is allowed, but it
/// must not collide with another record's identifier.
#[instrument(skip(store, record), fields(new_sin = %record.sin))]
pub async fn update_record(
    store: &RecordStore,
    sin: &str,
    mut record: EquipmentRecord,
) -> Result<EquipmentRecord> {
    normalize_record(&mut record)?;

    let updated = store
        .mutate(|records| {
            let index = records
                .iter()
                .position(|r| r.sin == sin)
                .ok_or_else(|| Error::RecordNotFound {
                    sin: sin.to_string(),
                })?;

            if record.sin != sin {
                if records
                    .iter()
                    .enumerate()
                    .any(|(i, r)| i != index && r.sin == record.sin)
                {
                    return Err(Error::DuplicateSin {
                        sin: record.sin.clone(),
                    });
                }
                warn!("Record {} is being renamed to {}", sin, record.sin);
            }

            records[index] = record.clone();
            Ok(record)
        })
        .await?;

    info!("Updated record {}", sin);
    Ok(updated)
}

/// Removes the record stored under `sin`.
#[instrument(skip(store))]
pub async fn delete_record(store: &RecordStore, sin: &str) -> Result<()> {
    store
        .mutate(|records| {
            let index = records
                .iter()
                .position(|r| r.sin == sin)
                .ok_or_else(|| Error::RecordNotFound {
                    sin: sin.to_string(),
                })?;
            records.remove(index);
            Ok(())
        })
        .await?;

    info!("Deleted record {}", sin);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::DateField;
    use crate::test_utils::*;
    use chrono::Duration;

    #[test]
    fn test_normalize_recomputes_next_date() -> Result<()> {
        let mut record = EquipmentRecord::new("I1");
        record.last_maintenance_date = date(2023, 3, 1).into();
        record.cycle = Some(FieldValue::text("2"));
        record.next_maintenance_date = date(1999, 1, 1).into();

        normalize_record(&mut record)?;
        assert_eq!(
            record.next_maintenance_date.date(),
            Some(date(2023, 3, 1) + Duration::days(730))
        );
        Ok(())
    }

    #[test]
    fn test_normalize_clears_next_date_without_last_date() -> Result<()> {
        let mut record = EquipmentRecord::new("I1");
        record.cycle = Some(FieldValue::integer(1));
        record.next_maintenance_date = date(2030, 1, 1).into();

        normalize_record(&mut record)?;
        assert_eq!(record.next_maintenance_date.date(), None);
        Ok(())
    }

    #[test]
    fn test_normalize_blank_insulation_readings() -> Result<()> {
        let mut record = record_with_schedule("I1", None, 1);
        record.ir_ht_lt = Some(FieldValue::text(""));
        record.ir_ht_body = Some(FieldValue::text("450"));
        record.surge_arrester_resistance = Some(FieldValue::text(""));

        normalize_record(&mut record)?;
        assert_eq!(record.ir_ht_lt, None);
        assert_eq!(record.ir_ht_body, Some(FieldValue::text("450")));
        // Only the insulation readings are normalised.
        assert_eq!(record.surge_arrester_resistance, Some(FieldValue::text("")));
        Ok(())
    }

    #[test]
    fn test_normalize_rejects_bad_cycles() {
        let mut record = EquipmentRecord::new("I1");
        record.last_maintenance_date = date(2023, 3, 1).into();

        record.cycle = Some(FieldValue::text("often"));
        assert!(matches!(
            normalize_record(&mut record),
            Err(Error::InvalidInput { .. })
        ));

        record.cycle = Some(FieldValue::integer(-1));
        assert!(matches!(
            normalize_record(&mut record),
            Err(Error::InvalidInput { .. })
        ));

        record.cycle = None;
        assert!(matches!(
            normalize_record(&mut record),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_normalize_rejects_blank_sin() {
        let mut record = EquipmentRecord::new("  ");
        assert!(matches!(
            normalize_record(&mut record),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_record_appends_and_persists() -> Result<()> {
        let (store, repo) = setup_store(vec![record_with_schedule("I1", None, 1)]).await?;

        let mut input = EquipmentRecord::new("I2");
        input.last_maintenance_date = date(2023, 1, 1).into();
        input.cycle = Some(FieldValue::text("1"));
        let created = create_record(&store, input).await?;

        assert_eq!(created.next_maintenance_date.date(), Some(date(2024, 1, 1)));
        let all = list_records(&store).await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].sin, "I2");
        assert_eq!(repo.persisted().await, all);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_duplicate_sin_leaves_collection_unchanged() -> Result<()> {
        let original = record_with_schedule("I1", Some(date(2023, 1, 1)), 1);
        let (store, repo) = setup_store(vec![original.clone()]).await?;

        let result = create_record(&store, record_with_schedule("I1", None, 3)).await;
        assert!(matches!(result, Err(Error::DuplicateSin { .. })));
        assert_eq!(list_records(&store).await, vec![original.clone()]);
        assert_eq!(repo.persisted().await, vec![original]);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() -> Result<()> {
        let (store, _repo) = setup_store(vec![
            record_with_schedule("I1", None, 1),
            record_with_schedule("I2", None, 1),
            record_with_schedule("I3", None, 1),
        ])
        .await?;

        let mut replacement = record_with_schedule("I2", Some(date(2024, 1, 1)), 2);
        replacement.next_maintenance_date = DateField::empty();
        let updated = update_record(&store, "I2", replacement).await?;
        assert_eq!(
            updated.next_maintenance_date.date(),
            Some(date(2024, 1, 1) + Duration::days(730))
        );

        let all = list_records(&store).await;
        assert_eq!(
            all.iter().map(|r| r.sin.as_str()).collect::<Vec<_>>(),
            vec!["I1", "I2", "I3"]
        );
        assert_eq!(all[1], updated);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() -> Result<()> {
        let (store, _repo) = setup_store(vec![record_with_schedule("I1", None, 1)]).await?;
        let result = update_record(&store, "I9", record_with_schedule("I9", None, 1)).await;
        assert!(matches!(result, Err(Error::RecordNotFound { .. })));
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_may_rename_but_not_collide() -> Result<()> {
        let (store, _repo) = setup_store(vec![
            record_with_schedule("I1", None, 1),
            record_with_schedule("I2", None, 1),
        ])
        .await?;

        let collide = update_record(&store, "I1", record_with_schedule("I2", None, 1)).await;
        assert!(matches!(collide, Err(Error::DuplicateSin { .. })));

        update_record(&store, "I1", record_with_schedule("I10", None, 1)).await?;
        assert!(store.get("I1").await.is_none());
        assert!(store.get("I10").await.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_record() -> Result<()> {
        let (store, repo) = setup_store(vec![
            record_with_schedule("I1", None, 1),
            record_with_schedule("I2", None, 1),
        ])
        .await?;

        delete_record(&store, "I1").await?;
        assert_eq!(store.len().await, 1);
        assert_eq!(repo.persisted().await.len(), 1);

        let missing = delete_record(&store, "I1").await;
        assert!(matches!(missing, Err(Error::RecordNotFound { .. })));
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_rolls_back_on_storage_failure() -> Result<()> {
        let (store, repo) = setup_store(vec![]).await?;
        repo.set_fail_saves(true);

        let result = create_record(&store, record_with_schedule("I1", None, 1)).await;
        assert!(matches!(result, Err(Error::Storage { .. })));
        assert!(store.is_empty().await);
        Ok(())
    }
}
