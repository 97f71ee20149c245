//! Modelo de ChargingSession
//!
//! Evento de carga acotado en el tiempo. `end_time` queda en `null`
//! mientras la sesión sigue abierta.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Record;
use crate::gateway::Table;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingSession {
    pub id: i64,
    pub vehicle_id: i64,
    pub fleet_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Energía consumida en kWh
    pub energy_used: Option<Decimal>,
    pub battery_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for ChargingSession {
    const NAME: &'static str = "Charging session";
    const TABLE: Table = Table::ChargingSessions;
    const ORDER_BY: &'static str = "start_time";
}
