//! Modelos del sistema
//!
//! Registros tal como los devuelve el gateway: nombres de columna
//! snake_case, ids asignados por el store.

pub mod auth;
pub mod charging_session;
pub mod fleet;
pub mod vehicle;

use serde::{de::DeserializeOwned, Serialize};

use crate::gateway::Table;

pub use auth::AuthenticatedUser;
pub use charging_session::ChargingSession;
pub use fleet::Fleet;
pub use vehicle::Vehicle;

/// Un tipo de registro persistido en una colección del gateway
pub trait Record: DeserializeOwned + Serialize + Send + Sync + 'static {
    /// Nombre legible para los mensajes de error
    const NAME: &'static str;
    const TABLE: Table;
    /// Columna de orden (descendente) para los listados
    const ORDER_BY: &'static str;
}
