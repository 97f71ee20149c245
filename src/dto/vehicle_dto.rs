use serde::Deserialize;
use validator::Validate;

use super::{set_if_present, set_or_null};
use crate::gateway::Changes;
use crate::utils::validation::double_option;

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[validate(required, length(min = 1))]
    pub owner: Option<String>,
    #[validate(required, length(min = 1))]
    pub model: Option<String>,
    #[validate(required, length(min = 1))]
    pub registration_number: Option<String>,
    pub fleet_id: Option<i64>,
}

impl CreateVehicleRequest {
    pub fn into_changes(self) -> Changes {
        let mut changes = Changes::new();
        set_if_present(&mut changes, "owner", self.owner);
        set_if_present(&mut changes, "model", self.model);
        set_if_present(&mut changes, "registration_number", self.registration_number);
        set_or_null(&mut changes, "fleet_id", self.fleet_id);
        changes
    }
}

// Request para actualizar un vehículo
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    pub owner: Option<String>,
    pub model: Option<String>,
    pub registration_number: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub fleet_id: Option<Option<i64>>,
}

impl UpdateVehicleRequest {
    pub fn into_changes(self) -> Changes {
        let mut changes = Changes::new();
        set_if_present(&mut changes, "owner", self.owner);
        set_if_present(&mut changes, "model", self.model);
        set_if_present(&mut changes, "registration_number", self.registration_number);
        set_if_present(&mut changes, "fleet_id", self.fleet_id);
        changes
    }
}

/// Filtros del listado de vehículos
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleFilters {
    pub fleet_id: Option<String>,
}
