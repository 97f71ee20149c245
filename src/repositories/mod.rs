//! Repositorios
//!
//! Acceso tipado a las colecciones del gateway. Cada repositorio decodifica
//! las filas JSON en su tipo de registro.

pub mod record_repository;

pub use record_repository::RecordRepository;

use crate::models::{ChargingSession, Fleet, Vehicle};

pub type FleetRepository = RecordRepository<Fleet>;
pub type VehicleRepository = RecordRepository<Vehicle>;
pub type SessionRepository = RecordRepository<ChargingSession>;
