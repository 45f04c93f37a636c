//! HTTP surface: record CRUD, report views, CSV downloads, and the static
//! browser pages.

/// Error-to-response mapping
pub mod error;
/// CSV download handlers
pub mod export;
/// Record CRUD handlers
pub mod records;
/// Summary and report view handlers
pub mod reports;

use crate::{clock::Clock, config::AppConfig, store::RecordStore};
use axum::{Json, Router, routing::get};
use std::sync::Arc;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Record collection
    pub store: Arc<RecordStore>,
    /// Reference date source for reports
    pub clock: Arc<dyn Clock>,
    /// Resolved configuration
    pub config: Arc<AppConfig>,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();
    let page = |name: &str| ServeFile::new(static_dir.join(name));

    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/api/records", get(records::list).post(records::create))
        .route(
            "/api/records/{sin}",
            get(records::fetch)
                .put(records::update)
                .delete(records::remove),
        )
        .route("/api/reports/summary", get(reports::summary))
        .route("/api/reports/{kind}", get(reports::view))
        .route("/api/export/{kind}", get(export::download))
        .route_service("/", page("index.html"))
        .route_service("/record-management", page("record-management.html"))
        .route_service("/reporting", page("reporting.html"))
        .fallback_service(ServeDir::new(&static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
