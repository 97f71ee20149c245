use axum::{
    http::HeaderValue,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::utils::pagination::PaginationSummary;

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Página de registros con su resumen de paginación
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationSummary,
}

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        let total = self.pagination.total;
        let mut response = Json(self).into_response();
        response
            .headers_mut()
            .insert(TOTAL_COUNT_HEADER, HeaderValue::from(total));
        response
    }
}
