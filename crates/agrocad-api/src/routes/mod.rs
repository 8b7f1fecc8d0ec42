//! # API Routes
//!
//! Route handlers for the producer registry API, grouped by resource.

pub mod dashboard;
pub mod farms;
pub mod producers;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health probe response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Build the health router. Mounted outside authentication so orchestration
/// probes work without credentials.
pub fn health_router() -> Router<AppState> {
    Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
}

/// GET /health/liveness — Process is up.
#[utoipa::path(
    get,
    path = "/health/liveness",
    responses((status = 200, description = "Alive", body = HealthResponse)),
    tag = "health"
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /health/readiness — Process is ready to serve traffic.
///
/// The in-memory stores are always ready once the process is serving; a
/// configured database that cannot be reached at startup fails the boot
/// before this route exists.
#[utoipa::path(
    get,
    path = "/health/readiness",
    responses((status = 200, description = "Ready", body = HealthResponse)),
    tag = "health"
)]
pub async fn readiness() -> (StatusCode, Json<HealthResponse>) {
    (StatusCode::OK, Json(HealthResponse { status: "ready" }))
}
