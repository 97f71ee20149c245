use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;
use crate::gateway::Table;

/// Agrupación de vehículos con nombre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for Fleet {
    const NAME: &'static str = "Fleet";
    const TABLE: Table = Table::Fleets;
    const ORDER_BY: &'static str = "created_at";
}
