//! CSV download handlers.
//!
//! An empty selection is not an error: the handler logs it and answers
//! `204 No Content` instead of producing a file.

use super::{
    AppState,
    error::ApiError,
    reports::{ReportParams, build_report},
};
use crate::core::export::{CsvExport, export_csv};
use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::info;

fn csv_response(export: Option<CsvExport>) -> Response {
    match export {
        None => {
            info!("No data to export.");
            StatusCode::NO_CONTENT.into_response()
        }
        Some(export) => {
            info!(
                "Exported {} records to {}",
                export.row_count, export.file_name
            );
            (
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", export.file_name),
                    ),
                ],
                export.content,
            )
                .into_response()
        }
    }
}

/// `GET /api/export/{kind}`
///
/// `all` exports the whole collection; any report view name exports that
/// view's matching records.
pub async fn download(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<ReportParams>,
) -> Result<Response, ApiError> {
    let now = state.clock.now_utc();
    let export = if kind == "all" {
        let records = state.store.snapshot().await;
        export_csv(&records, &state.config.export.all_data_prefix(), now)?
    } else {
        let report = build_report(&state, &kind, &params).await?;
        export_csv(
            &report.records,
            &state.config.export.filtered_data_prefix(),
            now,
        )?
    };
    Ok(csv_response(export))
}
