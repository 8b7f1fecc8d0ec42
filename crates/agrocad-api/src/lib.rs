//! # agrocad-api — Axum API for the Rural Producer Registry
//!
//! HTTP surface over the agrocad domain: producer registration keyed by
//! validated CPF/CNPJ documents, farms with land-use invariants, crop
//! declarations, and dashboard aggregations.
//!
//! ## API Surface
//!
//! | Prefix              | Module                  | Domain                 |
//! |---------------------|-------------------------|------------------------|
//! | `/v1/producers/*`   | [`routes::producers`]   | Producer CRUD          |
//! | `/v1/farms/*`       | [`routes::farms`]       | Farm CRUD + crops      |
//! | `/v1/dashboard/*`   | [`routes::dashboard`]   | Aggregations           |
//! | `/health/*`         | [`routes`]              | Probes (unauthenticated) |
//! | `/openapi.json`     | [`openapi`]             | Generated spec         |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the auth middleware
/// so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };
    let metrics = ApiMetrics::new();

    // Authenticated API routes.
    let api = Router::new()
        .merge(routes::producers::router())
        .merge(routes::farms::router())
        .merge(routes::dashboard::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .layer(axum::Extension(metrics))
        .with_state(state.clone());

    // Unauthenticated health probes.
    let health = routes::health_router().with_state(state);

    Router::new().merge(health).merge(api)
}
