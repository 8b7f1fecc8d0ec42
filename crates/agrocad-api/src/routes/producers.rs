//! # Producer CRUD API
//!
//! Create, list, fetch, update, and delete rural producer records.
//!
//! Document (CPF/CNPJ) validation happens here at the typed boundary: the
//! raw request string becomes a [`DocumentId`] before any record exists,
//! and the registry admits exactly one producer per canonical document —
//! a second registration is a 409, not a validation error.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use agrocad_core::DocumentId;
use agrocad_model::{normalize_email, normalize_name, normalize_phone, Address, Uf};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::{AppState, ProducerRecord};

/// Postal address payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddressPayload {
    pub street: String,
    pub city: String,
    /// Two-letter federative unit code (e.g. "SP").
    pub state: String,
    pub zip_code: String,
}

/// Producer create/update payload.
///
/// `PUT` replaces all fields; there is no partial update.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProducerPayload {
    /// CPF or CNPJ, punctuated or bare digits.
    pub document: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: AddressPayload,
}

impl Validate for ProducerPayload {
    fn validate(&self) -> Result<(), String> {
        if self.document.trim().is_empty() {
            return Err("document must not be empty".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        Ok(())
    }
}

/// Validated field set built from a [`ProducerPayload`].
struct ProducerFields {
    document: DocumentId,
    name: String,
    email: String,
    phone: String,
    address: Address,
}

impl ProducerFields {
    /// Run every domain rule over the payload. Any failure is a 422.
    fn from_payload(payload: &ProducerPayload) -> Result<Self, AppError> {
        let document = DocumentId::new(&payload.document)?;
        let name = normalize_name(&payload.name)?;
        let email = normalize_email(&payload.email)?;
        let phone = normalize_phone(&payload.phone)?;
        let uf: Uf = payload.address.state.parse()?;
        let address = Address::new(
            &payload.address.street,
            &payload.address.city,
            uf,
            &payload.address.zip_code,
        )?;
        Ok(Self {
            document,
            name,
            email,
            phone,
            address,
        })
    }
}

/// List query parameters.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListParams {
    /// Page size, 1..=200. Defaults to 50.
    pub limit: Option<usize>,
    /// Records to skip. Defaults to 0.
    pub offset: Option<usize>,
}

impl ListParams {
    pub(crate) fn limit(&self) -> usize {
        self.limit.unwrap_or(50).clamp(1, 200)
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }
}

/// Paginated producer list response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListProducersResponse {
    /// Total producers in the registry (before pagination).
    pub total: usize,
    pub items: Vec<ProducerRecord>,
}

/// Build the producers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/producers", get(list_producers).post(create_producer))
        .route(
            "/v1/producers/:id",
            get(get_producer).put(update_producer).delete(delete_producer),
        )
}

/// POST /v1/producers — Register a producer.
#[utoipa::path(
    post,
    path = "/v1/producers",
    request_body = ProducerPayload,
    responses(
        (status = 201, description = "Producer created", body = ProducerRecord),
        (status = 409, description = "Document already registered", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failure", body = crate::error::ErrorBody),
    ),
    tag = "producers"
)]
pub async fn create_producer(
    State(state): State<AppState>,
    body: Result<Json<ProducerPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ProducerRecord>), AppError> {
    let payload = extract_validated_json(body)?;
    let fields = ProducerFields::from_payload(&payload)?;

    if state
        .find_producer_by_document(fields.document.as_str())
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "document {} is already registered",
            fields.document
        )));
    }

    let now = Utc::now();
    let record = ProducerRecord {
        id: Uuid::new_v4(),
        document: fields.document,
        name: fields.name,
        email: fields.email,
        phone: fields.phone,
        address: fields.address,
        created_at: now,
        updated_at: now,
    };

    state.producers.insert(record.id, record.clone());
    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::producers::insert(pool, &record).await {
            tracing::error!(error = %e, id = %record.id, "failed to persist producer");
        }
    }

    tracing::info!(id = %record.id, kind = %record.document.kind(), "producer registered");
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /v1/producers — List producers, newest first.
#[utoipa::path(
    get,
    path = "/v1/producers",
    params(ListParams),
    responses(
        (status = 200, description = "Producer list", body = ListProducersResponse),
    ),
    tag = "producers"
)]
pub async fn list_producers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<ListProducersResponse> {
    let mut all = state.producers.list();
    all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let total = all.len();
    let items = all
        .into_iter()
        .skip(params.offset())
        .take(params.limit())
        .collect();
    Json(ListProducersResponse { total, items })
}

/// GET /v1/producers/:id — Fetch a producer.
#[utoipa::path(
    get,
    path = "/v1/producers/{id}",
    params(("id" = Uuid, Path, description = "Producer ID")),
    responses(
        (status = 200, description = "Producer found", body = ProducerRecord),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "producers"
)]
pub async fn get_producer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProducerRecord>, AppError> {
    state
        .producers
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("producer {id} not found")))
}

/// PUT /v1/producers/:id — Replace a producer's fields.
#[utoipa::path(
    put,
    path = "/v1/producers/{id}",
    params(("id" = Uuid, Path, description = "Producer ID")),
    request_body = ProducerPayload,
    responses(
        (status = 200, description = "Producer updated", body = ProducerRecord),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 409, description = "Document already registered to another producer", body = crate::error::ErrorBody),
    ),
    tag = "producers"
)]
pub async fn update_producer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<ProducerPayload>, JsonRejection>,
) -> Result<Json<ProducerRecord>, AppError> {
    let payload = extract_validated_json(body)?;
    let fields = ProducerFields::from_payload(&payload)?;

    if !state.producers.contains(&id) {
        return Err(AppError::NotFound(format!("producer {id} not found")));
    }

    // The new document may not belong to a different producer.
    if let Some(existing) = state.find_producer_by_document(fields.document.as_str()) {
        if existing.id != id {
            return Err(AppError::Conflict(format!(
                "document {} is already registered",
                fields.document
            )));
        }
    }

    let updated = state
        .producers
        .update(&id, |record| {
            record.document = fields.document.clone();
            record.name = fields.name.clone();
            record.email = fields.email.clone();
            record.phone = fields.phone.clone();
            record.address = fields.address.clone();
            record.updated_at = Utc::now();
        })
        .ok_or_else(|| AppError::NotFound(format!("producer {id} not found")))?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::producers::update(pool, &updated).await {
            tracing::error!(error = %e, id = %id, "failed to persist producer update");
        }
    }

    Ok(Json(updated))
}

/// DELETE /v1/producers/:id — Remove a producer and all of their farms.
#[utoipa::path(
    delete,
    path = "/v1/producers/{id}",
    params(("id" = Uuid, Path, description = "Producer ID")),
    responses(
        (status = 204, description = "Producer deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "producers"
)]
pub async fn delete_producer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .producers
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("producer {id} not found")))?;

    let removed_farms = state.farms.remove_where(|farm| farm.producer_id == id);

    if let Some(pool) = &state.db_pool {
        // The FK cascade removes the farms rows alongside the producer.
        if let Err(e) = crate::db::producers::delete(pool, id).await {
            tracing::error!(error = %e, id = %id, "failed to delete producer from database");
        }
    }

    tracing::info!(id = %id, farms = removed_farms.len(), "producer deleted");
    Ok(StatusCode::NO_CONTENT)
}
