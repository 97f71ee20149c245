use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::session_controller::SessionController;
use crate::dto::list_dto::ListResponse;
use crate::dto::session_dto::{CreateSessionRequest, SessionFilters, UpdateSessionRequest};
use crate::models::ChargingSession;
use super::not_found;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::{PageParams, Pagination};

pub fn create_session_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions).post(create_session).fallback(not_found))
        .route(
            "/:id",
            get(get_session).put(update_session).delete(delete_session).fallback(not_found),
        )
}

async fn list_sessions(
    State(state): State<AppState>,
    filters: Result<Query<SessionFilters>, QueryRejection>,
    page: Result<Query<PageParams>, QueryRejection>,
) -> Result<ListResponse<ChargingSession>, AppError> {
    let Query(filters) = filters?;
    let Query(page) = page?;
    SessionController::new(&state)
        .list(filters, Pagination::from(&page))
        .await
}

async fn get_session(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ChargingSession>, AppError> {
    let Path(id) = path?;
    Ok(Json(SessionController::new(&state).get(id).await?))
}

async fn create_session(
    State(state): State<AppState>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ChargingSession>), AppError> {
    let Json(request) = payload?;
    let session = SessionController::new(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn update_session(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateSessionRequest>, JsonRejection>,
) -> Result<Json<ChargingSession>, AppError> {
    let Path(id) = path?;
    let Json(request) = payload?;
    Ok(Json(SessionController::new(&state).update(id, request).await?))
}

async fn delete_session(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    SessionController::new(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
