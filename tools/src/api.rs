//! HTTP surface: one read-only endpoint per query, plus static files.
//!
//! RULE: Handlers only read through `FieldQueries`. Nothing here mutates
//! the registry; a reload would build a new state and a new router.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use fields_core::{
    field::Field,
    geometry::GeoPoint,
    query::FieldQueries,
    types::{FieldId, Meters, SquareMeters},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};

#[derive(Clone)]
pub struct AppState {
    pub queries:   Arc<dyn FieldQueries>,
    pub loaded_at: DateTime<Utc>,
}

pub fn create_router(state: AppState, static_dir: impl AsRef<std::path::Path>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/fields", get(list_fields))
        // Static segment; must not be captured as an id.
        .route("/api/fields/contains", get(field_containing))
        .route("/api/fields/:id/area", get(field_area))
        .route("/api/fields/:id/distance", get(distance_to_center))
        // Source documents and any front-end assets.
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Handlers ──────────────────────────────────────────────────

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status":    "healthy",
        "fields":    state.queries.list_all().len(),
        "loaded_at": state.loaded_at.to_rfc3339(),
    }))
}

async fn list_fields(State(state): State<AppState>) -> Json<Vec<Field>> {
    Json(state.queries.list_all().to_vec())
}

async fn field_area(
    State(state): State<AppState>,
    Path(id): Path<FieldId>,
) -> Json<SquareMeters> {
    Json(state.queries.area_of(id))
}

async fn distance_to_center(
    State(state): State<AppState>,
    Path(id): Path<FieldId>,
    Query(point): Query<GeoPoint>,
) -> Json<Meters> {
    Json(state.queries.distance_to_center(id, point))
}

async fn field_containing(
    State(state): State<AppState>,
    Query(point): Query<GeoPoint>,
) -> Result<Json<Field>, AppError> {
    match state.queries.find_containing(point) {
        Some(field) => Ok(Json(field.clone())),
        None => {
            log::debug!("No field contains ({}, {})", point.lat, point.lng);
            Err(AppError::NotFound(format!(
                "No field contains ({}, {})",
                point.lat, point.lng
            )))
        }
    }
}

// ── Errors ────────────────────────────────────────────────────

#[derive(Debug)]
enum AppError {
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
