//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Agrocad API — Rural Producer Registry",
        version = "0.3.2",
        description = "CPF/CNPJ-validated rural producer registry: producers, farms with land-use invariants, crop declarations, and dashboard aggregations.",
        license(name = "MIT")
    ),
    paths(
        // Producers
        crate::routes::producers::create_producer,
        crate::routes::producers::list_producers,
        crate::routes::producers::get_producer,
        crate::routes::producers::update_producer,
        crate::routes::producers::delete_producer,
        // Farms
        crate::routes::farms::create_farm,
        crate::routes::farms::list_farms,
        crate::routes::farms::get_farm,
        crate::routes::farms::update_farm,
        crate::routes::farms::delete_farm,
        crate::routes::farms::add_crop,
        // Dashboard
        crate::routes::dashboard::dashboard_stats,
        crate::routes::dashboard::farm_sizes,
        // Health
        crate::routes::liveness,
        crate::routes::readiness,
    ),
    components(schemas(
        // State record types
        crate::state::ProducerRecord,
        crate::state::FarmRecord,
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        // Producer DTOs
        crate::routes::producers::ProducerPayload,
        crate::routes::producers::AddressPayload,
        crate::routes::producers::ListProducersResponse,
        // Farm DTOs
        crate::routes::farms::FarmPayload,
        crate::routes::farms::CropPayload,
        crate::routes::farms::ListFarmsResponse,
        // Dashboard DTOs
        crate::routes::dashboard::DashboardStats,
        crate::routes::dashboard::LandUse,
        crate::routes::dashboard::LandUseSlice,
        crate::routes::dashboard::LabelledCount,
        crate::routes::dashboard::FarmSizesResponse,
        crate::routes::dashboard::FarmSizeBucket,
        // Health
        crate::routes::HealthResponse,
    )),
    tags(
        (name = "producers", description = "Producer registration with CPF/CNPJ validation"),
        (name = "farms", description = "Farms, land-use areas, and crop declarations"),
        (name = "dashboard", description = "Registry-wide aggregations"),
        (name = "health", description = "Orchestration probes"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
