use validator::Validate;

use super::eq_filter;
use crate::dto::list_dto::ListResponse;
use crate::dto::session_dto::{CreateSessionRequest, SessionFilters, UpdateSessionRequest};
use crate::models::{ChargingSession, Record};
use crate::repositories::SessionRepository;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::pagination::Pagination;

pub struct SessionController {
    repository: SessionRepository,
}

impl SessionController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repository(),
        }
    }

    pub async fn list(
        &self,
        filters: SessionFilters,
        pagination: Pagination,
    ) -> Result<ListResponse<ChargingSession>, AppError> {
        let filters = [
            eq_filter("vehicle_id", filters.vehicle_id),
            eq_filter("fleet_id", filters.fleet_id),
        ]
        .into_iter()
        .flatten()
        .collect();

        let (data, total) = self.repository.list(filters, &pagination).await?;
        Ok(ListResponse {
            data,
            pagination: pagination.summary(total),
        })
    }

    pub async fn get(&self, id: i64) -> Result<ChargingSession, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error(ChargingSession::NAME, id))
    }

    pub async fn create(&self, request: CreateSessionRequest) -> Result<ChargingSession, AppError> {
        request.validate()?;
        self.repository.create(request.into_changes()).await
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateSessionRequest,
    ) -> Result<ChargingSession, AppError> {
        self.repository
            .update(id, request.into_changes())
            .await?
            .ok_or_else(|| not_found_error(ChargingSession::NAME, id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.repository.delete(id).await
    }
}
