use serde::Deserialize;
use validator::Validate;

use super::{set_if_present, set_or_null};
use crate::gateway::Changes;
use crate::utils::validation::{double_option, non_empty};

// Request para crear una flota
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFleetRequest {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    pub location: Option<String>,
}

impl CreateFleetRequest {
    pub fn into_changes(self) -> Changes {
        let mut changes = Changes::new();
        set_if_present(&mut changes, "name", self.name);
        set_or_null(&mut changes, "location", non_empty(self.location));
        changes
    }
}

// Request para actualizar una flota
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFleetRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
}

impl UpdateFleetRequest {
    pub fn into_changes(self) -> Changes {
        let mut changes = Changes::new();
        set_if_present(&mut changes, "name", self.name);
        set_if_present(&mut changes, "location", self.location);
        changes
    }
}
