//! Middleware de autenticación (Auth Gate)
//!
//! Extrae el bearer token, lo delega al verificador de identidad y, si es
//! válido, inyecta el [`AuthenticatedUser`] en las extensions del request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{
    models::AuthenticatedUser, state::AppState, utils::errors::AppError,
    utils::jwt::extract_token_from_header,
};

pub const MISSING_TOKEN: &str = "Missing Bearer token";
pub const INVALID_TOKEN: &str = "Invalid or expired token";

/// Rechaza con 401 antes de llegar a cualquier handler
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_token_from_header)
        .map(str::to_owned)
        .ok_or_else(|| AppError::Unauthorized(MISSING_TOKEN.to_string()))?;

    let user: AuthenticatedUser = match state.verifier.verify(&token).await? {
        Some(user) => user,
        None => {
            warn!("🔒 Token rechazado para {} {}", request.method(), request.uri().path());
            return Err(AppError::Unauthorized(INVALID_TOKEN.to_string()));
        }
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
