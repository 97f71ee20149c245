//! Services module
//!
//! Integraciones con servicios externos que no son almacenamiento.

pub mod auth_service;

pub use auth_service::{IdentityVerifier, JwtVerifier, SupabaseVerifier};
