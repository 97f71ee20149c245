//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. No hay estado mutable propio: todo vive en
//! el gateway y en el proveedor de identidad.

use std::sync::Arc;

use crate::gateway::DataGateway;
use crate::repositories::RecordRepository;
use crate::services::IdentityVerifier;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn DataGateway>,
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn DataGateway>, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { gateway, verifier }
    }

    /// Repositorio tipado sobre el gateway compartido
    pub fn repository<T: crate::models::Record>(&self) -> RecordRepository<T> {
        RecordRepository::new(self.gateway.clone())
    }
}
