use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ter_system::{
    build_app,
    config::EnvironmentConfig,
    database,
    services::{background_tasks::BackgroundTasks, llm_client::GeminiClient},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("📡 Sistema de Experticias Técnicas");
    info!("================================================");

    let config = EnvironmentConfig::from_env()?;
    if config.is_development() {
        warn!("🧪 Ejecutando en modo desarrollo");
    }

    let pool = database::connect(&config.database).await?;
    database::run_migrations(&pool).await?;
    database::bootstrap_admin(&pool, &config.bootstrap_admin_password).await?;

    if config.llm.api_key.is_none() {
        warn!("🤖 LLM_API_KEY no configurada, el chatbot responderá con error");
    }
    let llm = Arc::new(GeminiClient::new(config.llm.clone())?);

    let tasks = BackgroundTasks::spawn(pool.clone(), config.sweeps);

    let addr: SocketAddr = config.server_url().parse()?;
    let app = build_app(AppState::new(pool, config, llm));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints principales:");
    info!("   POST /api/auth/login - Iniciar sesión");
    info!("   GET  /api/solicitudes - Listar solicitudes");
    info!("   GET  /api/dashboard/stats - Estadísticas");
    info!("   POST /api/chatbot/message - Consultar al asistente");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    {
        error!("❌ Error del servidor: {}", e);
    }

    tasks.shutdown();
    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
