use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use ev_fleet_api::gateway::{
    Changes, DataGateway, GatewayError, MemoryGateway, Row, SelectQuery, SelectResult, Table,
};
use ev_fleet_api::routes::create_app;
use ev_fleet_api::services::JwtVerifier;
use ev_fleet_api::state::AppState;
use ev_fleet_api::utils::jwt::{generate_token, JwtClaims, JwtConfig};

const SECRET: &str = "test-secret-test-secret-test-secret-32";

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: SECRET.to_string(),
        audience: None,
    }
}

fn token() -> String {
    let now = chrono::Utc::now().timestamp();
    generate_token(
        &JwtClaims {
            sub: "7d3a2c1e-operator".to_string(),
            email: Some("operator@fleet.test".to_string()),
            role: Some("authenticated".to_string()),
            aud: Some("authenticated".to_string()),
            exp: (now + 3600) as usize,
            iat: now as usize,
        },
        &jwt_config(),
    )
    .unwrap()
}

// Función helper para crear la app de test
fn create_test_app() -> (Router, Arc<MemoryGateway>) {
    let gateway = Arc::new(MemoryGateway::new());
    let state = AppState::new(gateway.clone(), Arc::new(JwtVerifier::new(jwt_config())));
    (create_app(state, &[]), gateway)
}

/// Gateway que cuenta cada llamada antes de delegar en memoria
#[derive(Default)]
struct CountingGateway {
    inner: MemoryGateway,
    calls: AtomicUsize,
}

impl CountingGateway {
    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataGateway for CountingGateway {
    fn backend(&self) -> &'static str {
        "counting"
    }

    async fn select(&self, table: Table, query: &SelectQuery) -> Result<SelectResult, GatewayError> {
        self.hit();
        self.inner.select(table, query).await
    }

    async fn fetch(&self, table: Table, id: i64) -> Result<Option<Row>, GatewayError> {
        self.hit();
        self.inner.fetch(table, id).await
    }

    async fn insert(&self, table: Table, row: Changes) -> Result<Row, GatewayError> {
        self.hit();
        self.inner.insert(table, row).await
    }

    async fn update(&self, table: Table, id: i64, changes: Changes) -> Result<Option<Row>, GatewayError> {
        self.hit();
        self.inner.update(table, id, changes).await
    }

    async fn delete(&self, table: Table, id: i64) -> Result<(), GatewayError> {
        self.hit();
        self.inner.delete(table, id).await
    }
}

fn create_counting_app() -> (Router, Arc<CountingGateway>) {
    let gateway = Arc::new(CountingGateway::default());
    let state = AppState::new(gateway.clone(), Arc::new(JwtVerifier::new(jwt_config())));
    (create_app(state, &[]), gateway)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token()));
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, json)
}

#[tokio::test]
async fn test_root_is_public() {
    let (app, _) = create_test_app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_missing_token_is_rejected_before_data_layer() {
    let (app, gateway) = create_counting_app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/fleets")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "name": "North" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body["error"], "Missing Bearer token");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/sessions?vehicleId=1")
                .header(header::AUTHORIZATION, "Bearer forged")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(gateway.calls(), 0);

    // Con token válido sí se llega al gateway
    let (status, _, _) = send(&app, Method::GET, "/api/fleets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let (app, _) = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/vehicles")
                .header(header::AUTHORIZATION, "Bearer not.a.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_me_returns_verified_identity() {
    let (app, _) = create_test_app();
    let (status, _, body) = send(&app, Method::GET, "/api/auth/me", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "7d3a2c1e-operator");
    assert_eq!(body["email"], "operator@fleet.test");
}

#[tokio::test]
async fn test_create_vehicle_defaults_fleet_to_null() {
    let (app, _) = create_test_app();
    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/vehicles",
        Some(json!({ "owner": "Alice", "model": "X", "registrationNumber": "AB-123" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_i64());
    assert_eq!(body["owner"], "Alice");
    assert_eq!(body["model"], "X");
    assert_eq!(body["registration_number"], "AB-123");
    assert_eq!(body["fleet_id"], Value::Null);
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn test_create_vehicle_missing_fields_is_400() {
    let (app, _) = create_test_app();
    let (status, _, body) = send(&app, Method::POST, "/api/vehicles", Some(json!({ "owner": "Alice" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "model, registrationNumber are required");
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let (app, _) = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/fleets")
                .header(header::AUTHORIZATION, format!("Bearer {}", token()))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fleet_crud_lifecycle() {
    let (app, _) = create_test_app();

    let (status, _, created) = send(
        &app,
        Method::POST,
        "/api/fleets",
        Some(json!({ "name": "Depot A", "location": "Lyon" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    // Solo cambia el nombre; location se conserva
    let (status, _, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/fleets/{}", id),
        Some(json!({ "name": "Depot B", "unknownField": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Depot B");
    assert_eq!(updated["location"], "Lyon");
    assert_eq!(updated["created_at"], created["created_at"]);

    // null explícito limpia un campo opcional
    let (_, _, cleared) = send(
        &app,
        Method::PUT,
        &format!("/api/fleets/{}", id),
        Some(json!({ "location": null })),
    )
    .await;
    assert_eq!(cleared["location"], Value::Null);
    assert_eq!(cleared["name"], "Depot B");

    let (status, _, fetched) = send(&app, Method::GET, &format!("/api/fleets/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, cleared);

    let (status, _, body) = send(&app, Method::DELETE, &format!("/api/fleets/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _, _) = send(&app, Method::GET, &format!("/api/fleets/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_missing_record_is_404() {
    let (app, _) = create_test_app();
    let (status, _, body) = send(&app, Method::PUT, "/api/vehicles/999", Some(json!({ "model": "Y" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Vehicle with id '999' not found");
}

#[tokio::test]
async fn test_non_numeric_id_is_400() {
    let (app, _) = create_test_app();
    let (status, _, _) = send(&app, Method::GET, "/api/sessions/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sessions_are_filtered_and_paginated() {
    let (app, _) = create_test_app();

    for hour in 0..12 {
        let vehicle = if hour % 4 == 3 { 7 } else { 42 };
        let (status, _, _) = send(
            &app,
            Method::POST,
            "/api/sessions",
            Some(json!({
                "vehicleId": vehicle,
                "fleetId": 1,
                "startTime": format!("2024-05-01T{:02}:00:00Z", hour + 8),
                "energyUsed": 10.5,
                "batteryStatus": "charging"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // 9 sesiones del vehículo 42 → la página 2 de 5 tiene 4
    let (status, headers, body) =
        send(&app, Method::GET, "/api/sessions?vehicleId=42&page=2&pageSize=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["x-total-count"], "9");
    assert_eq!(
        body["pagination"],
        json!({ "page": 2, "pageSize": 5, "total": 9, "totalPages": 2 })
    );

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 4);
    assert!(data.iter().all(|s| s["vehicle_id"] == 42));
    assert!(data.iter().all(|s| s["energy_used"] == json!(10.5)));

    // Orden descendente por start_time
    let starts: Vec<&str> = data.iter().map(|s| s["start_time"].as_str().unwrap()).collect();
    let mut sorted = starts.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(starts, sorted);
}

#[tokio::test]
async fn test_list_clamps_pagination() {
    let (app, _) = create_test_app();
    send(&app, Method::POST, "/api/fleets", Some(json!({ "name": "Only" }))).await;

    let (status, _, body) = send(&app, Method::GET, "/api/fleets?page=0&pageSize=500", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["pagination"],
        json!({ "page": 1, "pageSize": 100, "total": 1, "totalPages": 1 })
    );

    let (_, _, empty) = send(&app, Method::GET, "/api/vehicles?fleetId=3", None).await;
    assert_eq!(
        empty,
        json!({ "data": [], "pagination": { "page": 1, "pageSize": 10, "total": 0, "totalPages": 0 } })
    );
}

#[tokio::test]
async fn test_create_session_requires_vehicle_and_start() {
    let (app, _) = create_test_app();
    let (status, _, body) = send(&app, Method::POST, "/api/sessions", Some(json!({ "fleetId": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "startTime, vehicleId are required");
}

#[tokio::test]
async fn test_unmatched_route_is_json_404() {
    let (app, _) = create_test_app();
    let (status, _, body) = send(&app, Method::GET, "/api/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not Found" }));
}

#[tokio::test]
async fn test_duplicate_query_parameter_is_json_400() {
    let (app, gateway) = create_counting_app();

    for uri in [
        "/api/sessions?vehicleId=1&vehicleId=2",
        "/api/vehicles?fleetId=1&fleetId=2",
        "/api/fleets?page=1&page=2",
    ] {
        let (status, headers, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(body["code"], "BAD_REQUEST");
        assert!(body["error"].as_str().unwrap().contains("duplicate field"));
    }
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_unsupported_method_is_json_404() {
    let (app, _) = create_test_app();

    for (method, uri) in [
        (Method::PATCH, "/api/fleets/1"),
        (Method::DELETE, "/api/vehicles"),
        (Method::PUT, "/api/auth/me"),
        (Method::POST, "/"),
    ] {
        let (status, _, body) = send(&app, method.clone(), uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_eq!(body, json!({ "error": "Not Found" }));
    }
}
