use validator::Validate;

use crate::dto::fleet_dto::{CreateFleetRequest, UpdateFleetRequest};
use crate::dto::list_dto::ListResponse;
use crate::models::{Fleet, Record};
use crate::repositories::FleetRepository;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::pagination::Pagination;

pub struct FleetController {
    repository: FleetRepository,
}

impl FleetController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repository(),
        }
    }

    pub async fn list(&self, pagination: Pagination) -> Result<ListResponse<Fleet>, AppError> {
        let (data, total) = self.repository.list(Vec::new(), &pagination).await?;
        Ok(ListResponse {
            data,
            pagination: pagination.summary(total),
        })
    }

    pub async fn get(&self, id: i64) -> Result<Fleet, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error(Fleet::NAME, id))
    }

    pub async fn create(&self, request: CreateFleetRequest) -> Result<Fleet, AppError> {
        request.validate()?;
        self.repository.create(request.into_changes()).await
    }

    pub async fn update(&self, id: i64, request: UpdateFleetRequest) -> Result<Fleet, AppError> {
        self.repository
            .update(id, request.into_changes())
            .await?
            .ok_or_else(|| not_found_error(Fleet::NAME, id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.repository.delete(id).await
    }
}
