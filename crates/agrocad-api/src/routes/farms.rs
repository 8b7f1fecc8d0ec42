//! # Farm CRUD API
//!
//! Farms belong to producers and carry the land-use invariant: the
//! agricultural and vegetation areas together never exceed the total.
//! Crop entries are unique per (kind, harvest) within a farm and may not
//! declare more planted hectares than the farm's arable area.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use agrocad_model::{
    crop_fits_farm, ensure_no_duplicate_crops, Crop, CropKind, FarmAreas, HarvestYear, Uf,
};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::{AppState, FarmRecord};

/// Crop entry payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CropPayload {
    /// Catalog crop name (e.g. "Soja", "Café").
    #[schema(value_type = String)]
    pub kind: CropKind,
    /// Harvest year.
    pub harvest: i32,
    /// Planted area in hectares, optional.
    pub planted_area: Option<f64>,
}

impl CropPayload {
    fn into_crop(self) -> Result<Crop, AppError> {
        let harvest = HarvestYear::new(self.harvest)?;
        Ok(Crop::new(self.kind, harvest, self.planted_area)?)
    }
}

impl Validate for CropPayload {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Farm create/update payload.
///
/// `PUT` replaces all fields including the crop list.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FarmPayload {
    pub producer_id: Uuid,
    pub name: String,
    pub city: String,
    /// Two-letter federative unit code (e.g. "MT").
    pub state: String,
    pub total_area: f64,
    pub agricultural_area: f64,
    pub vegetation_area: f64,
    #[serde(default)]
    pub crops: Vec<CropPayload>,
}

impl Validate for FarmPayload {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.city.trim().is_empty() {
            return Err("city must not be empty".to_string());
        }
        Ok(())
    }
}

/// Validated field set built from a [`FarmPayload`].
struct FarmFields {
    producer_id: Uuid,
    name: String,
    city: String,
    state: Uf,
    areas: FarmAreas,
    crops: Vec<Crop>,
}

impl FarmFields {
    /// Run every domain rule over the payload. Any failure is a 422.
    fn from_payload(payload: FarmPayload) -> Result<Self, AppError> {
        let state: Uf = payload.state.parse()?;
        let areas = FarmAreas::new(
            payload.total_area,
            payload.agricultural_area,
            payload.vegetation_area,
        )?;
        let crops = payload
            .crops
            .into_iter()
            .map(CropPayload::into_crop)
            .collect::<Result<Vec<_>, _>>()?;
        for crop in &crops {
            crop_fits_farm(crop, &areas)?;
        }
        ensure_no_duplicate_crops(&crops)?;
        Ok(Self {
            producer_id: payload.producer_id,
            name: payload.name.trim().to_string(),
            city: payload.city.trim().to_string(),
            state,
            areas,
            crops,
        })
    }
}

/// Farm list query parameters.
#[derive(Debug, Deserialize, IntoParams)]
pub struct FarmListParams {
    /// Restrict to one producer's farms.
    pub producer_id: Option<Uuid>,
    /// Page size, 1..=200. Defaults to 50.
    pub limit: Option<usize>,
    /// Records to skip. Defaults to 0.
    pub offset: Option<usize>,
}

/// Paginated farm list response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListFarmsResponse {
    /// Total farms matching the filter (before pagination).
    pub total: usize,
    pub items: Vec<FarmRecord>,
}

/// Build the farms router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/farms", get(list_farms).post(create_farm))
        .route(
            "/v1/farms/:id",
            get(get_farm).put(update_farm).delete(delete_farm),
        )
        .route("/v1/farms/:id/crops", post(add_crop))
}

/// POST /v1/farms — Register a farm.
///
/// The referenced producer must exist; a farm pointing nowhere is a 409,
/// not a validation error, because the payload itself is well-formed.
#[utoipa::path(
    post,
    path = "/v1/farms",
    request_body = FarmPayload,
    responses(
        (status = 201, description = "Farm created", body = FarmRecord),
        (status = 409, description = "Producer does not exist", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failure", body = crate::error::ErrorBody),
    ),
    tag = "farms"
)]
pub async fn create_farm(
    State(state): State<AppState>,
    body: Result<Json<FarmPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<FarmRecord>), AppError> {
    let payload = extract_validated_json(body)?;
    let fields = FarmFields::from_payload(payload)?;

    if !state.producers.contains(&fields.producer_id) {
        return Err(AppError::Conflict(format!(
            "producer {} does not exist",
            fields.producer_id
        )));
    }

    let now = Utc::now();
    let record = FarmRecord {
        id: Uuid::new_v4(),
        producer_id: fields.producer_id,
        name: fields.name,
        city: fields.city,
        state: fields.state,
        total_area: fields.areas.total,
        agricultural_area: fields.areas.agricultural,
        vegetation_area: fields.areas.vegetation,
        crops: fields.crops,
        created_at: now,
        updated_at: now,
    };

    state.farms.insert(record.id, record.clone());
    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::farms::insert(pool, &record).await {
            tracing::error!(error = %e, id = %record.id, "failed to persist farm");
        }
    }

    tracing::info!(id = %record.id, producer = %record.producer_id, "farm registered");
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /v1/farms — List farms, newest first, optionally by producer.
#[utoipa::path(
    get,
    path = "/v1/farms",
    params(FarmListParams),
    responses(
        (status = 200, description = "Farm list", body = ListFarmsResponse),
    ),
    tag = "farms"
)]
pub async fn list_farms(
    State(state): State<AppState>,
    Query(params): Query<FarmListParams>,
) -> Json<ListFarmsResponse> {
    let mut all: Vec<FarmRecord> = state
        .farms
        .list()
        .into_iter()
        .filter(|farm| {
            params
                .producer_id
                .map_or(true, |producer_id| farm.producer_id == producer_id)
        })
        .collect();
    all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let total = all.len();
    let items = all
        .into_iter()
        .skip(params.offset.unwrap_or(0))
        .take(params.limit.unwrap_or(50).clamp(1, 200))
        .collect();
    Json(ListFarmsResponse { total, items })
}

/// GET /v1/farms/:id — Fetch a farm.
#[utoipa::path(
    get,
    path = "/v1/farms/{id}",
    params(("id" = Uuid, Path, description = "Farm ID")),
    responses(
        (status = 200, description = "Farm found", body = FarmRecord),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "farms"
)]
pub async fn get_farm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FarmRecord>, AppError> {
    state
        .farms
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("farm {id} not found")))
}

/// PUT /v1/farms/:id — Replace a farm's fields.
#[utoipa::path(
    put,
    path = "/v1/farms/{id}",
    params(("id" = Uuid, Path, description = "Farm ID")),
    request_body = FarmPayload,
    responses(
        (status = 200, description = "Farm updated", body = FarmRecord),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 409, description = "Producer does not exist", body = crate::error::ErrorBody),
    ),
    tag = "farms"
)]
pub async fn update_farm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<FarmPayload>, JsonRejection>,
) -> Result<Json<FarmRecord>, AppError> {
    let payload = extract_validated_json(body)?;
    let fields = FarmFields::from_payload(payload)?;

    if !state.farms.contains(&id) {
        return Err(AppError::NotFound(format!("farm {id} not found")));
    }
    if !state.producers.contains(&fields.producer_id) {
        return Err(AppError::Conflict(format!(
            "producer {} does not exist",
            fields.producer_id
        )));
    }

    let updated = state
        .farms
        .update(&id, |record| {
            record.producer_id = fields.producer_id;
            record.name = fields.name.clone();
            record.city = fields.city.clone();
            record.state = fields.state;
            record.total_area = fields.areas.total;
            record.agricultural_area = fields.areas.agricultural;
            record.vegetation_area = fields.areas.vegetation;
            record.crops = fields.crops.clone();
            record.updated_at = Utc::now();
        })
        .ok_or_else(|| AppError::NotFound(format!("farm {id} not found")))?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::farms::update(pool, &updated).await {
            tracing::error!(error = %e, id = %id, "failed to persist farm update");
        }
    }

    Ok(Json(updated))
}

/// DELETE /v1/farms/:id — Remove a farm.
#[utoipa::path(
    delete,
    path = "/v1/farms/{id}",
    params(("id" = Uuid, Path, description = "Farm ID")),
    responses(
        (status = 204, description = "Farm deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "farms"
)]
pub async fn delete_farm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .farms
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("farm {id} not found")))?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::farms::delete(pool, id).await {
            tracing::error!(error = %e, id = %id, "failed to delete farm from database");
        }
    }

    tracing::info!(id = %id, "farm deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/farms/:id/crops — Append a crop entry to a farm.
#[utoipa::path(
    post,
    path = "/v1/farms/{id}/crops",
    params(("id" = Uuid, Path, description = "Farm ID")),
    request_body = CropPayload,
    responses(
        (status = 200, description = "Crop added", body = FarmRecord),
        (status = 404, description = "Farm not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failure", body = crate::error::ErrorBody),
    ),
    tag = "farms"
)]
pub async fn add_crop(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<CropPayload>, JsonRejection>,
) -> Result<Json<FarmRecord>, AppError> {
    let payload = extract_validated_json(body)?;
    let crop = payload.into_crop()?;

    let farm = state
        .farms
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("farm {id} not found")))?;

    let areas = FarmAreas::new(
        farm.total_area,
        farm.agricultural_area,
        farm.vegetation_area,
    )?;
    crop_fits_farm(&crop, &areas)?;

    let mut crops = farm.crops.clone();
    crops.push(crop);
    ensure_no_duplicate_crops(&crops)?;

    let updated = state
        .farms
        .update(&id, |record| {
            record.crops = crops.clone();
            record.updated_at = Utc::now();
        })
        .ok_or_else(|| AppError::NotFound(format!("farm {id} not found")))?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::farms::update(pool, &updated).await {
            tracing::error!(error = %e, id = %id, "failed to persist crop addition");
        }
    }

    Ok(Json(updated))
}
