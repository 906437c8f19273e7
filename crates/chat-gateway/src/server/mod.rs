//! Gateway server setup
//!
//! Builds the store, the coordination core and the router, then serves
//! WebSocket and HTTP on one listener.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use chat_common::{AppConfig, AppError};
use chat_db::MemoryStore;
use chat_service::{RoomDirectory, ServiceContext, SessionService};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::api;

/// Create the gateway router (unlayered)
pub fn create_router() -> Router<GatewayState> {
    Router::new().route("/gateway", get(gateway_handler))
}

/// Build the complete application
///
/// The WebSocket and health routes bypass the rate limiter.
pub fn create_app(state: GatewayState) -> Result<Router, AppError> {
    let config = state.config();
    let rest = api::apply_middleware(
        api::api_routes(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;

    Ok(create_router()
        .merge(api::health_routes())
        .merge(rest)
        .with_state(state))
}

/// Connect the store and build `GatewayState`
///
/// Without `DATABASE_URL` everything lives in process memory.
pub async fn create_gateway_state(config: AppConfig) -> Result<GatewayState, AppError> {
    let service_context = match config.database.url.as_deref() {
        Some(url) => {
            tracing::info!("Connecting to PostgreSQL...");
            let db_config = chat_db::DatabaseConfig::new(
                url,
                config.database.max_connections,
                config.database.min_connections,
            );
            let pool = chat_db::create_pool(&db_config)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            chat_db::ensure_schema(&pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            tracing::info!("PostgreSQL connection established");
            ServiceContext::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store");
            ServiceContext::in_memory(Arc::new(MemoryStore::new()))
        }
    };

    let directory = RoomDirectory::new(service_context.clone());
    directory
        .load()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(GatewayState::new(
        service_context,
        Arc::new(directory),
        config,
    ))
}

/// Periodically drop durable session rows nobody has touched for a while
pub fn spawn_session_cleanup(state: &GatewayState) -> JoinHandle<()> {
    let ctx = state.service_context().clone();
    let gateway = &state.config().gateway;
    let every = gateway.session_cleanup_interval();
    let ttl = gateway.session_ttl();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            if let Err(e) = SessionService::new(&ctx).cleanup_idle(ttl).await {
                tracing::warn!(error = %e, "Session cleanup failed");
            }
        }
    })
}

/// Serve until Ctrl-C, then drain the message pipeline
pub async fn run_server(state: GatewayState, addr: SocketAddr) -> Result<(), AppError> {
    let app = create_app(state.clone())?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/gateway", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::internal)?;

    tracing::info!("Draining message pipeline");
    state.pipeline().shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_gateway_state(config).await?;
    let cleanup = spawn_session_cleanup(&state);

    let result = run_server(state, addr).await;
    cleanup.abort();
    result
}
