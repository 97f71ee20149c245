use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::fleet_controller::FleetController;
use crate::dto::fleet_dto::{CreateFleetRequest, UpdateFleetRequest};
use crate::dto::list_dto::ListResponse;
use crate::models::Fleet;
use super::not_found;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::{PageParams, Pagination};

pub fn create_fleet_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_fleets).post(create_fleet).fallback(not_found))
        .route(
            "/:id",
            get(get_fleet).put(update_fleet).delete(delete_fleet).fallback(not_found),
        )
}

async fn list_fleets(
    State(state): State<AppState>,
    page: Result<Query<PageParams>, QueryRejection>,
) -> Result<ListResponse<Fleet>, AppError> {
    let Query(page) = page?;
    FleetController::new(&state).list(Pagination::from(&page)).await
}

async fn get_fleet(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Fleet>, AppError> {
    let Path(id) = path?;
    Ok(Json(FleetController::new(&state).get(id).await?))
}

async fn create_fleet(
    State(state): State<AppState>,
    payload: Result<Json<CreateFleetRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Fleet>), AppError> {
    let Json(request) = payload?;
    let fleet = FleetController::new(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(fleet)))
}

async fn update_fleet(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateFleetRequest>, JsonRejection>,
) -> Result<Json<Fleet>, AppError> {
    let Path(id) = path?;
    let Json(request) = payload?;
    Ok(Json(FleetController::new(&state).update(id, request).await?))
}

async fn delete_fleet(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    FleetController::new(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
