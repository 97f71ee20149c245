use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::list_dto::ListResponse;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleFilters};
use crate::models::Vehicle;
use super::not_found;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::{PageParams, Pagination};

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle).fallback(not_found))
        .route(
            "/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle).fallback(not_found),
        )
}

async fn list_vehicles(
    State(state): State<AppState>,
    filters: Result<Query<VehicleFilters>, QueryRejection>,
    page: Result<Query<PageParams>, QueryRejection>,
) -> Result<ListResponse<Vehicle>, AppError> {
    let Query(filters) = filters?;
    let Query(page) = page?;
    VehicleController::new(&state)
        .list(filters, Pagination::from(&page))
        .await
}

async fn get_vehicle(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vehicle>, AppError> {
    let Path(id) = path?;
    Ok(Json(VehicleController::new(&state).get(id).await?))
}

async fn create_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<CreateVehicleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    let Json(request) = payload?;
    let vehicle = VehicleController::new(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateVehicleRequest>, JsonRejection>,
) -> Result<Json<Vehicle>, AppError> {
    let Path(id) = path?;
    let Json(request) = payload?;
    Ok(Json(VehicleController::new(&state).update(id, request).await?))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    VehicleController::new(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
