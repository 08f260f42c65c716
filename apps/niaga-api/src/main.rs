//! # Niaga API Server
//!
//! ## Usage
//! ```bash
//! # Defaults: 0.0.0.0:8080, ./niaga.db
//! cargo run -p niaga-api
//!
//! # Override anything through the environment
//! NIAGA_SERVER__PORT=9090 NIAGA_DATABASE__PATH=./data/niaga.db cargo run -p niaga-api
//! ```

use std::net::SocketAddr;

use niaga_api::{create_app, AppState, Settings};
use niaga_db::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "niaga_api=info,niaga_db=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    info!("Starting Niaga API server...");

    let settings = Settings::load()?;
    info!(
        environment = %settings.environment,
        database = %settings.database.path,
        "Configuration loaded"
    );

    let db_config = if settings.database.path == ":memory:" {
        DbConfig::in_memory()
    } else {
        DbConfig::new(&settings.database.path).max_connections(settings.database.max_connections)
    };
    let db = Database::new(db_config).await?;

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    let app = create_app(AppState::new(db.clone(), settings));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
