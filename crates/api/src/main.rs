use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voyage_api::config::ServerConfig;
use voyage_api::router::build_app_router;
use voyage_api::state::AppState;
use voyage_store::RecordClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "voyage_api=debug,voyage_store=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    if config.admin.password_hash.is_empty() {
        tracing::warn!("ADMIN_PASSWORD_HASH is not set; admin login is disabled");
    }
    if config.store.api_token.is_empty() {
        tracing::warn!("NOCODB_API_TOKEN is not set; record store calls will be rejected");
    }

    // --- Record store ---
    let store = RecordClient::new(config.store.clone())?;
    tracing::info!(base_url = %config.store.base_url, "Record store client ready");

    let addr = SocketAddr::new(config.host.parse()?, config.port);

    let state = AppState {
        store: Arc::new(store),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Resolve when the process receives SIGINT (Ctrl-C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, starting graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
