//! Roteiro API server entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use roteiro_api::routes;
use roteiro_api::state::AppState;
use roteiro_core::clock::{Clock, SystemClock};
use roteiro_core::storage::StoragePort;
use roteiro_script::ScriptRepository;
use roteiro_storage::SqliteStorage;
use roteiro_sync::SyncLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Roteiro API server");

    // Read configuration from environment.
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://roteiro.db?mode=rwc".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| format!("PORT must be a valid u16: {e}"))?;

    // Create the database pool and bring the schema up to date.
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;

    // Wire the engine: storage port → sync layer → repository.
    let storage: Arc<dyn StoragePort> = Arc::new(SqliteStorage::new(pool));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let sync = Arc::new(SyncLayer::new(storage.clone(), clock.clone()));
    let repository = Arc::new(ScriptRepository::load(storage.as_ref(), sync).await?);

    // Build application state.
    let app_state = AppState::new(repository, clock);

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/steps", routes::steps::router())
        .nest("/api/v1/products", routes::products::router())
        .nest("/api/v1/transfer", routes::transfer::router())
        .nest("/api/v1/sessions", routes::session::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| format!("invalid HOST:PORT combination: {e}"))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
