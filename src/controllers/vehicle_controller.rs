use validator::Validate;

use super::eq_filter;
use crate::dto::list_dto::ListResponse;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleFilters};
use crate::models::{Record, Vehicle};
use crate::repositories::VehicleRepository;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::pagination::Pagination;

pub struct VehicleController {
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repository(),
        }
    }

    pub async fn list(
        &self,
        filters: VehicleFilters,
        pagination: Pagination,
    ) -> Result<ListResponse<Vehicle>, AppError> {
        let filters = eq_filter("fleet_id", filters.fleet_id).into_iter().collect();
        let (data, total) = self.repository.list(filters, &pagination).await?;
        Ok(ListResponse {
            data,
            pagination: pagination.summary(total),
        })
    }

    pub async fn get(&self, id: i64) -> Result<Vehicle, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error(Vehicle::NAME, id))
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> Result<Vehicle, AppError> {
        request.validate()?;
        self.repository.create(request.into_changes()).await
    }

    pub async fn update(&self, id: i64, request: UpdateVehicleRequest) -> Result<Vehicle, AppError> {
        self.repository
            .update(id, request.into_changes())
            .await?
            .ok_or_else(|| not_found_error(Vehicle::NAME, id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.repository.delete(id).await
    }
}
