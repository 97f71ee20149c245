use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use super::{set_if_present, set_or_null};
use crate::gateway::Changes;
use crate::utils::validation::{double_option, non_empty};

// Request para registrar una sesión de carga
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub fleet_id: Option<i64>,
    #[validate(required)]
    pub vehicle_id: Option<i64>,
    #[validate(required)]
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub energy_used: Option<Decimal>,
    pub battery_status: Option<String>,
}

impl CreateSessionRequest {
    pub fn into_changes(self) -> Changes {
        let mut changes = Changes::new();
        set_or_null(&mut changes, "fleet_id", self.fleet_id);
        set_if_present(&mut changes, "vehicle_id", self.vehicle_id);
        set_if_present(&mut changes, "start_time", self.start_time);
        set_or_null(&mut changes, "end_time", self.end_time);
        set_or_null(&mut changes, "energy_used", self.energy_used);
        set_or_null(&mut changes, "battery_status", non_empty(self.battery_status));
        changes
    }
}

// Request para actualizar una sesión de carga
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub fleet_id: Option<Option<i64>>,
    pub vehicle_id: Option<i64>,
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_time: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub energy_used: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub battery_status: Option<Option<String>>,
}

impl UpdateSessionRequest {
    pub fn into_changes(self) -> Changes {
        let mut changes = Changes::new();
        set_if_present(&mut changes, "fleet_id", self.fleet_id);
        set_if_present(&mut changes, "vehicle_id", self.vehicle_id);
        set_if_present(&mut changes, "start_time", self.start_time);
        set_if_present(&mut changes, "end_time", self.end_time);
        set_if_present(&mut changes, "energy_used", self.energy_used);
        set_if_present(&mut changes, "battery_status", self.battery_status);
        changes
    }
}

/// Filtros del listado de sesiones
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFilters {
    pub vehicle_id: Option<String>,
    pub fleet_id: Option<String>,
}
