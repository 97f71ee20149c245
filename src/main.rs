use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use reqwest::Client;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ev_fleet_api::config::{AuthMode, ConfigError, DataBackend, EnvironmentConfig};
use ev_fleet_api::database;
use ev_fleet_api::gateway::{DataGateway, MemoryGateway, PostgresGateway, PostgrestGateway};
use ev_fleet_api::routes::create_app;
use ev_fleet_api::services::{IdentityVerifier, JwtVerifier, SupabaseVerifier};
use ev_fleet_api::state::AppState;
use ev_fleet_api::utils::jwt::JwtConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    info!("🔋 EV Fleet Management API");
    info!("================================================");

    let config = EnvironmentConfig::from_env().context("Configuración inválida")?;
    info!("🌍 Entorno: {}", config.environment);
    if config.cors_origins.is_empty() && !config.is_development() {
        warn!("⚠️ CORS_ORIGINS vacío: se aceptan peticiones de cualquier origen");
    }
    let http_client = Client::new();

    let gateway = build_gateway(&config, &http_client).await?;
    let verifier = build_verifier(&config, &http_client)?;
    info!("🗄️ Data gateway: {}", gateway.backend());

    let app = create_app(AppState::new(gateway, verifier), &config.cors_origins);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("Dirección inválida: {}", config.server_addr()))?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  / - Estado del servicio");
    info!("   GET  /api/auth/me - Identidad verificada");
    for resource in ["fleets", "vehicles", "sessions"] {
        info!("   GET|POST /api/{} - Listar / crear", resource);
        info!("   GET|PUT|DELETE /api/{}/:id - Obtener / actualizar / eliminar", resource);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

async fn build_gateway(config: &EnvironmentConfig, client: &Client) -> Result<Arc<dyn DataGateway>> {
    let gateway: Arc<dyn DataGateway> = match config.data_backend {
        DataBackend::Postgres => {
            let db = config
                .database
                .as_ref()
                .ok_or(ConfigError::Missing("DATABASE_URL"))?;
            Arc::new(PostgresGateway::new(database::connect(db).await?))
        }
        DataBackend::Postgrest => {
            let supabase = config
                .supabase
                .as_ref()
                .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
            Arc::new(PostgrestGateway::new(client.clone(), &supabase.url, &supabase.anon_key))
        }
        DataBackend::Memory => {
            warn!("⚠️ Usando almacenamiento en memoria: los datos se pierden al reiniciar");
            Arc::new(MemoryGateway::new())
        }
    };
    Ok(gateway)
}

fn build_verifier(config: &EnvironmentConfig, client: &Client) -> Result<Arc<dyn IdentityVerifier>> {
    let verifier: Arc<dyn IdentityVerifier> = match config.auth_mode {
        AuthMode::Supabase => {
            let supabase = config
                .supabase
                .as_ref()
                .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
            info!("🔐 Verificando tokens contra {}/auth/v1", supabase.url);
            Arc::new(SupabaseVerifier::new(client.clone(), &supabase.url, &supabase.anon_key))
        }
        AuthMode::Jwt => {
            let secret = config
                .jwt_secret
                .clone()
                .ok_or(ConfigError::Missing("SUPABASE_JWT_SECRET"))?;
            info!("🔐 Verificando tokens JWT localmente");
            Arc::new(JwtVerifier::new(JwtConfig {
                secret,
                audience: config.jwt_audience.clone(),
            }))
        }
    };
    Ok(verifier)
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
