//! Server binary: reads config from the environment, prepares the database, serves the API.

use academia_alunos::{
    app, ensure_alunos_table, ensure_database_exists, AlunoService, AppConfig, AppState, PgAlunoStore, PhotoStore,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("academia_alunos=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        environment = ?config.environment,
        expose_error_details = config.expose_error_details,
        upload_dir = %config.upload_dir.display(),
        "configuration loaded"
    );
    if config.is_development() && config.expose_error_details {
        tracing::warn!("development mode: backend error details are sent to clients");
    }

    if config.bootstrap_schema {
        ensure_database_exists(&config.database_url).await?;
    }
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.database_acquire_timeout)
        .connect(&config.database_url)
        .await?;
    if config.bootstrap_schema {
        ensure_alunos_table(&pool).await?;
    }
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let addr = config.bind_addr()?;
    let state = AppState {
        alunos: AlunoService::new(
            Arc::new(PgAlunoStore::new(pool.clone())),
            PhotoStore::new(config.upload_dir.clone()),
        ),
        config: Arc::new(config),
    };

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    pool.close().await;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
