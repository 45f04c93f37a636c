//! Dashboard summary and report view handlers.

use super::{AppState, error::ApiError};
use crate::{
    core::{
        filter::Selection,
        report::{self, Report, ReportEntry, ReportKind, ReportRequest, SummaryCounts},
    },
    entities::parse_date,
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Query parameters accepted by the report and export views.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportParams {
    /// Equipment type selection (`All` or absent means no filtering)
    #[serde(rename = "type")]
    pub equipment_type: Option<String>,
    /// Voltage class selection
    pub voltage: Option<String>,
    /// Cycle selection, date-range view only
    pub cycle: Option<String>,
    /// Identifier query, search view only
    pub sin: Option<String>,
    /// Start of the last-maintenance range (`YYYY-MM-DD`)
    pub start: Option<String>,
    /// End of the last-maintenance range (`YYYY-MM-DD`)
    pub end: Option<String>,
}

fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_date(text)
            .map(Some)
            .ok_or_else(|| Error::invalid_input(format!("Invalid {name} date: {text}"))),
    }
}

impl ReportParams {
    /// Builds the report request for the view named `kind`.
    pub fn to_request(&self, kind: &str) -> Result<ReportRequest> {
        let kind = match kind {
            "due" => ReportKind::Due,
            "next-month" => ReportKind::NextMonth,
            "search" => ReportKind::Search {
                sin: self.sin.clone().unwrap_or_default(),
            },
            "range" => ReportKind::DateRange {
                start: parse_bound("start", self.start.as_deref())?,
                end: parse_bound("end", self.end.as_deref())?,
                cycle: Selection::parse(self.cycle.as_deref()),
            },
            other => return Err(Error::invalid_input(format!("Unknown report: {other}"))),
        };

        Ok(ReportRequest {
            kind,
            equipment_type: Selection::parse(self.equipment_type.as_deref()),
            voltage: Selection::parse(self.voltage.as_deref()),
        })
    }
}

/// Report view response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    /// Date statuses were computed against
    pub reference_date: NaiveDate,
    /// Number of matching records
    pub count: usize,
    /// True when nothing matched
    pub empty: bool,
    /// Matching rows
    pub results: Vec<ReportEntry>,
}

impl From<&Report> for ReportResponse {
    fn from(report: &Report) -> Self {
        Self {
            reference_date: report.reference_date,
            count: report.count(),
            empty: report.is_empty(),
            results: report.entries(),
        }
    }
}

/// Runs the report named `kind` against the current collection.
pub(super) async fn build_report(
    state: &AppState,
    kind: &str,
    params: &ReportParams,
) -> Result<Report> {
    let request = params.to_request(kind)?;
    let records = state.store.snapshot().await;
    report::run_report(&records, &request, state.clock.today())
}

/// `GET /api/reports/summary`
pub async fn summary(State(state): State<AppState>) -> Json<SummaryCounts> {
    let records = state.store.snapshot().await;
    Json(report::summarize(&records, state.clock.today()))
}

/// `GET /api/reports/{kind}`
pub async fn view(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<ReportParams>,
) -> std::result::Result<Json<ReportResponse>, ApiError> {
    let report = build_report(&state, &kind, &params).await?;
    Ok(Json(ReportResponse::from(&report)))
}
