//! Configuración de variables de entorno
//!
//! Este módulo carga la configuración del entorno. Las variables que el
//! backend o el modo de auth elegido necesitan son obligatorias; el resto
//! tiene valores por defecto.

use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::config::database::DatabaseConfig;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Backend del External Data Gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBackend {
    Postgres,
    Postgrest,
    Memory,
}

impl FromStr for DataBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DataBackend::Postgres),
            "postgrest" | "supabase" => Ok(DataBackend::Postgrest),
            "memory" => Ok(DataBackend::Memory),
            _ => Err(()),
        }
    }
}

/// Cómo se verifican los bearer tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Supabase,
    Jwt,
}

impl FromStr for AuthMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supabase" | "remote" => Ok(AuthMode::Supabase),
            "jwt" | "local" => Ok(AuthMode::Jwt),
            _ => Err(()),
        }
    }
}

/// Credenciales del proyecto Supabase
#[derive(Debug, Clone, PartialEq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub data_backend: DataBackend,
    pub auth_mode: AuthMode,
    pub database: Option<DatabaseConfig>,
    pub supabase: Option<SupabaseConfig>,
    pub jwt_secret: Option<String>,
    pub jwt_audience: Option<String>,
}

impl EnvironmentConfig {
    /// Cargar desde las variables del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));
        fn parse<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value })
        }

        let port = match get("PORT") {
            Some(v) => parse("PORT", v)?,
            None => 3000,
        };
        let data_backend = match get("DATA_BACKEND") {
            Some(v) => parse("DATA_BACKEND", v)?,
            None => DataBackend::Postgres,
        };
        let auth_mode = match get("AUTH_MODE") {
            Some(v) => parse("AUTH_MODE", v)?,
            None => AuthMode::Supabase,
        };

        let supabase = match (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => Some(SupabaseConfig { url, anon_key }),
            _ => None,
        };
        let needs_supabase = data_backend == DataBackend::Postgrest || auth_mode == AuthMode::Supabase;
        if needs_supabase && supabase.is_none() {
            require("SUPABASE_URL")?;
            require("SUPABASE_ANON_KEY")?;
        }

        let database = if data_backend == DataBackend::Postgres {
            let mut db = DatabaseConfig::new(require("DATABASE_URL")?);
            if let Some(v) = get("DATABASE_MAX_CONNECTIONS") {
                db.max_connections = parse("DATABASE_MAX_CONNECTIONS", v)?;
            }
            Some(db)
        } else {
            None
        };

        let jwt_secret = match auth_mode {
            AuthMode::Jwt => Some(require("SUPABASE_JWT_SECRET")?),
            AuthMode::Supabase => get("SUPABASE_JWT_SECRET"),
        };

        Ok(Self {
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            cors_origins: get("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            data_backend,
            auth_mode,
            database,
            supabase,
            jwt_secret,
            jwt_audience: get("SUPABASE_JWT_AUDIENCE"),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
