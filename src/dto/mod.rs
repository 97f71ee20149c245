//! DTOs de la API
//!
//! Los requests usan nombres camelCase; cada DTO sabe convertirse en el
//! mapa de columnas snake_case que espera el gateway.

pub mod fleet_dto;
pub mod list_dto;
pub mod session_dto;
pub mod vehicle_dto;

use serde::Serialize;
use serde_json::Value;

use crate::gateway::Changes;

/// Inserta `column` solo si el campo vino en el request
pub(crate) fn set_if_present<T: Serialize>(changes: &mut Changes, column: &str, value: Option<T>) {
    if let Some(value) = value {
        changes.insert(column.to_string(), serde_json::json!(value));
    }
}

/// Inserta `column` siempre; un campo ausente se guarda como `null`
pub(crate) fn set_or_null<T: Serialize>(changes: &mut Changes, column: &str, value: Option<T>) {
    let value = value.map(|v| serde_json::json!(v)).unwrap_or(Value::Null);
    changes.insert(column.to_string(), value);
}
