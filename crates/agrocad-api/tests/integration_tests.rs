//! # Integration Tests for agrocad-api
//!
//! Exercises producer and farm CRUD, document uniqueness, land-use
//! invariants, crop rules, dashboard aggregations, authentication
//! middleware, health probes, and OpenAPI spec generation.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use agrocad_api::state::{AppConfig, AppState};

/// Helper: build the test app with auth disabled.
fn test_app() -> axum::Router {
    agrocad_api::app(AppState::new())
}

/// Helper: build the test app with auth enabled.
fn test_app_with_auth(token: &str) -> axum::Router {
    let config = AppConfig {
        port: 8080,
        auth_token: Some(token.to_string()),
    };
    agrocad_api::app(AppState::with_config(config, None))
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn producer_payload(document: &str) -> Value {
    json!({
        "document": document,
        "name": "Maria Souza",
        "email": "Maria@Example.com",
        "phone": "+55 11 98765-4321",
        "address": {
            "street": "Rua das Laranjeiras, 10",
            "city": "Campinas",
            "state": "SP",
            "zip_code": "13000-000"
        }
    })
}

fn farm_payload(producer_id: &str) -> Value {
    json!({
        "producer_id": producer_id,
        "name": "Fazenda Boa Vista",
        "city": "Rondonópolis",
        "state": "MT",
        "total_area": 1000.0,
        "agricultural_area": 600.0,
        "vegetation_area": 300.0,
        "crops": [
            {"kind": "Soja", "harvest": 2024, "planted_area": 400.0},
            {"kind": "Milho", "harvest": 2024}
        ]
    })
}

/// Helper: create a producer and return its record.
async fn create_producer(app: &axum::Router, document: &str) -> Value {
    let response = app
        .clone()
        .oneshot(post_json("/v1/producers", producer_payload(document)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_health_probes() {
    let app = test_app();
    for uri in ["/health/liveness", "/health/readiness"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

// -- Producer CRUD ------------------------------------------------------------

#[tokio::test]
async fn test_create_producer_canonicalizes_document() {
    let app = test_app();
    let created = create_producer(&app, "123.456.789-09").await;
    assert_eq!(created["document"], "12345678909");
    // Email is lowercased on the way in.
    assert_eq!(created["email"], "maria@example.com");
    assert!(created["id"].is_string());
}

#[tokio::test]
async fn test_create_producer_rejects_bad_check_digits() {
    let app = test_app();
    let response = app
        .oneshot(post_json(
            "/v1/producers",
            producer_payload("123.456.789-00"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_producer_rejects_repeated_digits() {
    let app = test_app();
    let response = app
        .oneshot(post_json("/v1/producers", producer_payload("111.111.111-11")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_duplicate_document_conflicts() {
    let app = test_app();
    create_producer(&app, "12345678909").await;
    // Same document in formatted form is still a duplicate.
    let response = app
        .oneshot(post_json(
            "/v1/producers",
            producer_payload("123.456.789-09"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_producer_accepts_cnpj() {
    let app = test_app();
    let created = create_producer(&app, "12.345.678/0001-95").await;
    assert_eq!(created["document"], "12345678000195");
}

#[tokio::test]
async fn test_get_update_delete_producer() {
    let app = test_app();
    let created = create_producer(&app, "12345678909").await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(get(&format!("/v1/producers/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut updated_payload = producer_payload("12345678909");
    updated_payload["name"] = json!("Maria S. Oliveira");
    let response = app
        .clone()
        .oneshot(put_json(&format!("/v1/producers/{id}"), updated_payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Maria S. Oliveira");

    let response = app
        .clone()
        .oneshot(delete(&format!("/v1/producers/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get(&format!("/v1/producers/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_cannot_steal_another_producers_document() {
    let app = test_app();
    create_producer(&app, "12345678909").await;
    let second = create_producer(&app, "12345678000195").await;
    let id = second["id"].as_str().unwrap();

    let response = app
        .oneshot(put_json(
            &format!("/v1/producers/{id}"),
            producer_payload("123.456.789-09"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_producers_paginates() {
    let app = test_app();
    create_producer(&app, "12345678909").await;
    create_producer(&app, "12345678000195").await;

    let response = app
        .oneshot(get("/v1/producers?limit=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

// -- Farm CRUD ------------------------------------------------------------------

#[tokio::test]
async fn test_create_farm_for_missing_producer_conflicts() {
    let app = test_app();
    let response = app
        .oneshot(post_json(
            "/v1/farms",
            farm_payload("00000000-0000-0000-0000-000000000000"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_farm_area_invariant_enforced() {
    let app = test_app();
    let producer = create_producer(&app, "12345678909").await;
    let mut payload = farm_payload(producer["id"].as_str().unwrap());
    payload["agricultural_area"] = json!(800.0);
    payload["vegetation_area"] = json!(300.0); // 800 + 300 > 1000

    let response = app.oneshot(post_json("/v1/farms", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_farm_rejects_duplicate_crop_per_harvest() {
    let app = test_app();
    let producer = create_producer(&app, "12345678909").await;
    let mut payload = farm_payload(producer["id"].as_str().unwrap());
    payload["crops"] = json!([
        {"kind": "Soja", "harvest": 2024},
        {"kind": "Soja", "harvest": 2024}
    ]);

    let response = app.oneshot(post_json("/v1/farms", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_farm_rejects_off_catalog_crop() {
    let app = test_app();
    let producer = create_producer(&app, "12345678909").await;
    let mut payload = farm_payload(producer["id"].as_str().unwrap());
    payload["crops"] = json!([{"kind": "Banana", "harvest": 2024}]);

    let response = app.oneshot(post_json("/v1/farms", payload)).await.unwrap();
    // Serde rejects the unknown variant before the handler runs.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_farm_crud_and_crop_addition() {
    let app = test_app();
    let producer = create_producer(&app, "12345678909").await;
    let producer_id = producer["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(post_json("/v1/farms", farm_payload(producer_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let farm = body_json(response).await;
    let farm_id = farm["id"].as_str().unwrap();
    assert_eq!(farm["crops"].as_array().unwrap().len(), 2);

    // Same kind, different harvest: allowed.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/farms/{farm_id}/crops"),
            json!({"kind": "Soja", "harvest": 2025, "planted_area": 100.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let farm = body_json(response).await;
    assert_eq!(farm["crops"].as_array().unwrap().len(), 3);

    // Same kind, same harvest: rejected.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/farms/{farm_id}/crops"),
            json!({"kind": "Soja", "harvest": 2024}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Planted area beyond the arable area: rejected.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/farms/{farm_id}/crops"),
            json!({"kind": "Arroz", "harvest": 2024, "planted_area": 700.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .clone()
        .oneshot(delete(&format!("/v1/farms/{farm_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_deleting_producer_cascades_farms() {
    let app = test_app();
    let producer = create_producer(&app, "12345678909").await;
    let producer_id = producer["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(post_json("/v1/farms", farm_payload(producer_id)))
        .await
        .unwrap();
    let farm = body_json(response).await;
    let farm_id = farm["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(delete(&format!("/v1/producers/{producer_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get(&format!("/v1/farms/{farm_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_farms_filters_by_producer() {
    let app = test_app();
    let first = create_producer(&app, "12345678909").await;
    let second = create_producer(&app, "12345678000195").await;
    for producer in [&first, &second] {
        let response = app
            .clone()
            .oneshot(post_json(
                "/v1/farms",
                farm_payload(producer["id"].as_str().unwrap()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let uri = format!("/v1/farms?producer_id={}", first["id"].as_str().unwrap());
    let response = app.oneshot(get(&uri)).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
}

// -- Dashboard -------------------------------------------------------------------

#[tokio::test]
async fn test_dashboard_stats_aggregate() {
    let app = test_app();
    let producer = create_producer(&app, "12345678909").await;
    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/farms",
            farm_payload(producer["id"].as_str().unwrap()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(get("/v1/dashboard/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats = body_json(response).await;
    assert_eq!(stats["total_producers"], 1);
    assert_eq!(stats["total_farms"], 1);
    assert_eq!(stats["total_hectares"], 1000.0);
    assert_eq!(stats["average_farm_size"], 1000.0);
    assert_eq!(stats["total_crops"], 2);
    assert_eq!(stats["farms_by_state"]["MT"], 1);
    assert_eq!(stats["land_use"]["agricultural"]["area"], 600.0);
    assert_eq!(stats["land_use"]["agricultural"]["percentage"], 60.0);
    assert_eq!(stats["land_use"]["unused"]["area"], 100.0);
}

#[tokio::test]
async fn test_dashboard_farm_sizes_buckets() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(get("/v1/dashboard/farm-sizes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let buckets = body["buckets"].as_array().unwrap();
    assert_eq!(buckets.len(), 6);
    assert!(buckets.iter().all(|b| b["count"] == 0));
}

// -- Authentication ----------------------------------------------------------------

#[tokio::test]
async fn test_auth_rejects_missing_and_wrong_token() {
    let app = test_app_with_auth("s3cret");

    let response = app.clone().oneshot(get("/v1/producers")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/producers")
                .header("authorization", "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_accepts_valid_token_and_skips_health() {
    let app = test_app_with_auth("s3cret");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/producers")
                .header("authorization", "Bearer s3cret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Probes stay open without credentials.
    let response = app.oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// -- OpenAPI ---------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_spec_served() {
    let app = test_app();
    let response = app.oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let spec = body_json(response).await;
    assert!(spec["paths"]["/v1/producers"].is_object());
    assert!(spec["paths"]["/v1/dashboard/stats"].is_object());
}
