//! Record CRUD handlers.

use super::{AppState, error::ApiError};
use crate::{core::record, entities::EquipmentRecord};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// `GET /api/records`
pub async fn list(State(state): State<AppState>) -> Json<Vec<EquipmentRecord>> {
    Json(record::list_records(&state.store).await)
}

/// `GET /api/records/{sin}`
pub async fn fetch(
    State(state): State<AppState>,
    Path(sin): Path<String>,
) -> Result<Json<EquipmentRecord>, ApiError> {
    Ok(Json(record::get_record(&state.store, &sin).await?))
}

/// `POST /api/records`
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<EquipmentRecord>,
) -> Result<(StatusCode, Json<EquipmentRecord>), ApiError> {
    let created = record::create_record(&state.store, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/records/{sin}`
pub async fn update(
    State(state): State<AppState>,
    Path(sin): Path<String>,
    Json(input): Json<EquipmentRecord>,
) -> Result<Json<EquipmentRecord>, ApiError> {
    Ok(Json(record::update_record(&state.store, &sin, input).await?))
}

/// `DELETE /api/records/{sin}`
pub async fn remove(
    State(state): State<AppState>,
    Path(sin): Path<String>,
) -> Result<StatusCode, ApiError> {
    record::delete_record(&state.store, &sin).await?;
    Ok(StatusCode::NO_CONTENT)
}
