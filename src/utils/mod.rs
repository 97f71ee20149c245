//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! paginación y JWT.

pub mod errors;
pub mod jwt;
pub mod pagination;
pub mod validation;
