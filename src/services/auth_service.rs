//! Verificación de identidad
//!
//! El Auth Gate delega en un [`IdentityVerifier`]: o bien el endpoint
//! `GET /auth/v1/user` del proveedor, o bien la verificación local del JWT
//! que el proveedor firma.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::AuthenticatedUser;
use crate::utils::errors::AppError;
use crate::utils::jwt::{verify_token, JwtConfig};

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// `Ok(None)` si el token no es válido; `Err` solo ante fallos del proveedor.
    async fn verify(&self, token: &str) -> Result<Option<AuthenticatedUser>, AppError>;
}

/// Verificación local de tokens HS256
#[derive(Debug, Clone)]
pub struct JwtVerifier {
    config: JwtConfig,
}

impl JwtVerifier {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Option<AuthenticatedUser>, AppError> {
        match verify_token(token, &self.config) {
            Ok(claims) => Ok(Some(AuthenticatedUser {
                id: claims.sub,
                email: claims.email,
                role: claims.role,
            })),
            Err(e) => {
                debug!("JWT rechazado: {}", e);
                Ok(None)
            }
        }
    }
}

/// Usuario tal como lo devuelve `GET /auth/v1/user`
#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

/// Verificación remota contra Supabase Auth
#[derive(Debug, Clone)]
pub struct SupabaseVerifier {
    client: Client,
    user_url: String,
    anon_key: String,
}

impl SupabaseVerifier {
    pub fn new(client: Client, supabase_url: &str, anon_key: impl Into<String>) -> Self {
        Self {
            client,
            user_url: format!("{}/auth/v1/user", supabase_url.trim_end_matches('/')),
            anon_key: anon_key.into(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for SupabaseVerifier {
    async fn verify(&self, token: &str) -> Result<Option<AuthenticatedUser>, AppError> {
        let response = self
            .client
            .get(&self.user_url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Upstream {
                status: None,
                message: format!("Auth provider unreachable: {}", e),
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(None);
        }
        if !status.is_success() {
            warn!("⚠️ Proveedor de auth respondió {}", status);
            return Ok(None);
        }

        let user: SupabaseUser = match response.json().await {
            Ok(user) => user,
            Err(e) => {
                warn!("⚠️ Respuesta de usuario ilegible: {}", e);
                return Ok(None);
            }
        };

        Ok(user.id.filter(|id| !id.is_empty()).map(|id| AuthenticatedUser {
            id,
            email: user.email,
            role: user.role,
        }))
    }
}
