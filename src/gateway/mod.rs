//! External Data Gateway
//!
//! Interfaz de almacenamiento sobre la que trabajan los repositorios:
//! CRUD por id más una consulta filtrada, ordenada y contada. Las filas
//! viajan como objetos JSON con nombres de columna snake_case, igual que
//! en el servicio hospedado original.

pub mod memory;
pub mod postgres;
pub mod postgrest;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::MemoryGateway;
pub use postgres::PostgresGateway;
pub use postgrest::PostgrestGateway;

/// Fila devuelta por el gateway
pub type Row = Value;

/// Columnas a escribir en un insert/update
pub type Changes = Map<String, Value>;

/// Colecciones conocidas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Fleets,
    Vehicles,
    ChargingSessions,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Fleets => "fleets",
            Table::Vehicles => "vehicles",
            Table::ChargingSessions => "charging_sessions",
        }
    }

    /// Columnas escribibles por la API; `id` y `created_at` las asigna el store.
    pub fn writable_columns(&self) -> &'static [&'static str] {
        match self {
            Table::Fleets => &["name", "location"],
            Table::Vehicles => &["owner", "model", "registration_number", "fleet_id"],
            Table::ChargingSessions => &[
                "vehicle_id",
                "fleet_id",
                "start_time",
                "end_time",
                "energy_used",
                "battery_status",
            ],
        }
    }

    pub fn is_column(&self, column: &str) -> bool {
        column == "id" || column == "created_at" || self.writable_columns().contains(&column)
    }

    pub(crate) fn check_columns<'a>(
        &self,
        columns: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), GatewayError> {
        for column in columns {
            if !self.is_column(column) {
                return Err(GatewayError::InvalidInput(format!(
                    "unknown column '{}' on {}",
                    column,
                    self.name()
                )));
            }
        }
        Ok(())
    }
}

/// Filtro de igualdad `column = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: String,
}

impl Filter {
    pub fn eq(column: &'static str, value: impl Into<String>) -> Self {
        Self { column, value: value.into() }
    }
}

/// Consulta de listado: filtros + orden descendente + ventana
#[derive(Debug, Clone)]
pub struct SelectQuery {
    pub filters: Vec<Filter>,
    pub order_by: &'static str,
    pub descending: bool,
    pub offset: u64,
    pub limit: u64,
}

/// Página de filas junto con el total que cumple los filtros
#[derive(Debug, Clone, Default)]
pub struct SelectResult {
    pub rows: Vec<Row>,
    pub total: u64,
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{message}")]
    Upstream { status: Option<u16>, message: String },

    #[error(transparent)]
    Sql(sqlx::Error),

    #[error("unexpected row shape: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Upstream {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Nombre corto del backend para los logs de arranque
    fn backend(&self) -> &'static str;

    async fn select(&self, table: Table, query: &SelectQuery) -> Result<SelectResult, GatewayError>;

    async fn fetch(&self, table: Table, id: i64) -> Result<Option<Row>, GatewayError>;

    async fn insert(&self, table: Table, row: Changes) -> Result<Row, GatewayError>;

    /// Aplica solo las columnas presentes en `changes`. `None` si no existe la fila.
    async fn update(&self, table: Table, id: i64, changes: Changes) -> Result<Option<Row>, GatewayError>;

    async fn delete(&self, table: Table, id: i64) -> Result<(), GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_columns() {
        assert!(Table::Vehicles.check_columns(["owner", "fleet_id"]).is_ok());
        assert!(matches!(
            Table::Vehicles.check_columns(["owner; drop table vehicles"]),
            Err(GatewayError::InvalidInput(_))
        ));
        assert!(Table::Fleets.check_columns(["vehicle_id"]).is_err());
    }
}
