//! Rutas HTTP
//!
//! Composición del router: raíz pública, recursos bajo `/api` protegidos
//! por el Auth Gate y fallback 404 en JSON, tanto para rutas desconocidas
//! como para métodos no soportados en una ruta conocida.

pub mod auth_routes;
pub mod fleet_routes;
pub mod session_routes;
pub mod vehicle_routes;

use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::{cors_middleware, require_auth};
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app(state: AppState, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes::create_auth_router())
        .nest("/fleets", fleet_routes::create_fleet_router())
        .nest("/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/sessions", session_routes::create_session_router())
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/", get(root).fallback(not_found))
        .nest("/api", api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware(cors_origins))
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "EV Fleet Management API running"
    }))
}

pub(crate) async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}
