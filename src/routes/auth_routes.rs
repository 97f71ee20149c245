use axum::{routing::get, Extension, Json, Router};

use super::not_found;
use crate::models::AuthenticatedUser;
use crate::state::AppState;

pub fn create_auth_router() -> Router<AppState> {
    Router::new().route("/me", get(me).fallback(not_found))
}

/// Identidad verificada por el Auth Gate
async fn me(Extension(user): Extension<AuthenticatedUser>) -> Json<AuthenticatedUser> {
    Json(user)
}
