//! Modelo de Vehicle
//!
//! Mapea la tabla `vehicles`. `fleet_id` es una referencia opcional a
//! `fleets.id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;
use crate::gateway::Table;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    pub owner: String,
    pub model: String,
    pub registration_number: String,
    pub fleet_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Record for Vehicle {
    const NAME: &'static str = "Vehicle";
    const TABLE: Table = Table::Vehicles;
    const ORDER_BY: &'static str = "created_at";
}
