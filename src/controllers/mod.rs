//! Controladores
//!
//! Validan el payload, lo traducen a columnas y delegan en el repositorio.

pub mod fleet_controller;
pub mod session_controller;
pub mod vehicle_controller;

use crate::gateway::Filter;

/// Filtro de igualdad solo si el parámetro vino y no está vacío
pub(crate) fn eq_filter(column: &'static str, value: Option<String>) -> Option<Filter> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(|v| Filter::eq(column, v))
}
