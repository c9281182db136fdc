use std::{future::Future, sync::Arc};

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use configs::{AppConfig, DatabaseConfig, ServerConfig};
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::subscription::{repo::seaorm::SeaOrmSubscriptionRepository, SubscriptionService};

use crate::routes::{self, AppState};

/// CORS restricted to the single configured origin.
pub fn build_cors(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .map_err(|e| anyhow::anyhow!("invalid cors origin {origin:?}: {e}"))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Connect to the database, apply migrations if configured, and wire the
/// repository into the service.
pub async fn build_state(cfg: &DatabaseConfig) -> anyhow::Result<AppState> {
    let db = models::db::connect_with_config(cfg).await?;
    if cfg.auto_migrate {
        migration::Migrator::up(&db, None).await?;
        info!(event = "migrated", "database schema up to date");
    }
    let repo = Arc::new(SeaOrmSubscriptionRepository::new(db));
    Ok(AppState::new(SubscriptionService::new(repo)))
}

pub fn build_app(state: AppState, server: &ServerConfig) -> anyhow::Result<Router> {
    let cors = build_cors(&server.cors_origin)?;
    Ok(routes::build_router(state, cors))
}

/// Public entry: build the app and serve until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&cfg.database).await?;
    let app = build_app(state, &cfg.server)?;

    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, cors_origin = %cfg.server.cors_origin, "starting subscription server");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}
