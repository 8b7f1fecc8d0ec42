//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor.
//!
//! ## Architecture
//!
//! The in-memory stores are the synchronous source of truth for reads;
//! Postgres (when configured) is the durable copy, written through on every
//! mutation and loaded once at startup via [`AppState::hydrate_from_db`].
//! When `DATABASE_URL` is absent the API runs in-memory only.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use agrocad_core::DocumentId;
use agrocad_model::{Address, Crop, Uf};

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because the lock is never held across `.await` points.
/// `parking_lot::RwLock` is non-poisonable — a panicking writer does not
/// permanently corrupt the store.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// List all records.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Update a record in place. Returns the updated record, or `None` if not found.
    pub fn update(&self, id: &Uuid, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.data.write();
        if let Some(entry) = guard.get_mut(id) {
            f(entry);
            Some(entry.clone())
        } else {
            None
        }
    }

    /// Remove a record by ID.
    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Remove every record matching a predicate, returning the removed records.
    pub fn remove_where(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        let mut guard = self.data.write();
        let ids: Vec<Uuid> = guard
            .iter()
            .filter(|(_, v)| predicate(v))
            .map(|(id, _)| *id)
            .collect();
        ids.into_iter().filter_map(|id| guard.remove(&id)).collect()
    }

    /// Check if a record exists.
    pub fn contains(&self, id: &Uuid) -> bool {
        self.data.read().contains_key(id)
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Record Types ---------------------------------------------------------------

/// Rural producer record (API-layer representation).
///
/// The `document` field is a validated [`DocumentId`] — a record holding an
/// invalid CPF/CNPJ is unrepresentable. Canonical-digit uniqueness across
/// producers is enforced at the store boundary (and by the DB UNIQUE
/// constraint), not by the document type itself.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProducerRecord {
    pub id: Uuid,
    /// CPF or CNPJ in canonical digits-only form.
    #[schema(value_type = String)]
    pub document: DocumentId,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[schema(value_type = Object)]
    pub address: Address,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Farm record (API-layer representation).
///
/// Area invariants (`agricultural + vegetation <= total`, bounds on the
/// total) are checked through `agrocad_model::FarmAreas` before a record
/// is ever constructed or updated.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FarmRecord {
    pub id: Uuid,
    pub producer_id: Uuid,
    pub name: String,
    pub city: String,
    /// Federative unit (two-letter code).
    #[schema(value_type = String)]
    pub state: Uf,
    /// Total area in hectares.
    pub total_area: f64,
    /// Arable area in hectares.
    pub agricultural_area: f64,
    /// Preserved vegetation area in hectares.
    pub vegetation_area: f64,
    /// Planted crops, unique per (kind, harvest).
    #[schema(value_type = Vec<Object>)]
    pub crops: Vec<Crop>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// -- Application State --------------------------------------------------------

/// Application configuration.
///
/// Custom `Debug` redacts the `auth_token` to prevent credential leakage
/// in logs.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Static bearer token for authentication.
    /// If `None`, authentication is disabled.
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
        }
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Producer records, keyed by id.
    pub producers: Store<ProducerRecord>,
    /// Farm records, keyed by id.
    pub farms: Store<FarmRecord>,

    /// PostgreSQL connection pool for durable persistence.
    /// `None` means in-memory-only mode.
    pub db_pool: Option<PgPool>,

    pub config: AppConfig,
}

impl AppState {
    /// Create a new application state with default configuration and no database.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// Create a new application state with the given configuration and
    /// optional database pool.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        Self {
            producers: Store::new(),
            farms: Store::new(),
            db_pool,
            config,
        }
    }

    /// Find a producer by the canonical digits of its document, if any.
    ///
    /// This is the uniqueness probe used by create/update: the registry
    /// admits one producer per CPF/CNPJ.
    pub fn find_producer_by_document(&self, canonical: &str) -> Option<ProducerRecord> {
        self.producers
            .list()
            .into_iter()
            .find(|p| p.document.as_str() == canonical)
    }

    /// Hydrate in-memory stores from the database.
    ///
    /// Called once on startup when a database pool is available, so that
    /// read operations stay fast and synchronous afterwards.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        let pool = match &self.db_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };

        let producers = crate::db::producers::load_all(pool)
            .await
            .map_err(|e| format!("failed to load producers: {e}"))?;
        let producer_count = producers.len();
        for record in producers {
            self.producers.insert(record.id, record);
        }

        let farms = crate::db::farms::load_all(pool)
            .await
            .map_err(|e| format!("failed to load farms: {e}"))?;
        let farm_count = farms.len();
        for record in farms {
            self.farms.insert(record.id, record);
        }

        tracing::info!(
            producers = producer_count,
            farms = farm_count,
            "Hydrated in-memory stores from database"
        );

        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
