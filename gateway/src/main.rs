use std::sync::Arc;

use anyhow::Result;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod ingestion;
mod routes;
mod scheduler;
mod store;

use config::AppConfig;
use store::{CatalogStore, ConjunctionStore};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub conjunctions: Arc<dyn ConjunctionStore>,
    pub config: Arc<AppConfig>,
    pub http_client: reqwest::Client,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "orbital_gateway=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(AppConfig::from_env());

    let catalog: Arc<dyn CatalogStore> = build_catalog_store().await?;
    let conjunctions: Arc<dyn ConjunctionStore> = build_conjunction_store().await?;

    let state = AppState {
        catalog: catalog.clone(),
        conjunctions,
        config: config.clone(),
        http_client: reqwest::Client::new(),
    };

    // Kept alive for the lifetime of the process; dropping it stops the
    // scheduled ingestion job.
    let _scheduler = scheduler::start(&config, catalog).await?;

    let app = routes::router(state).layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(%addr, "orbital gateway starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "postgres"))]
async fn build_catalog_store() -> Result<Arc<dyn CatalogStore>> {
    Ok(Arc::new(store::catalog::InMemoryCatalogStore::new()))
}

#[cfg(feature = "postgres")]
async fn build_catalog_store() -> Result<Arc<dyn CatalogStore>> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let store = store::catalog::PostgresCatalogStore::connect(&url).await?;
            Ok(Arc::new(store))
        }
        Err(_) => {
            tracing::warn!("postgres feature enabled but DATABASE_URL unset, falling back to in-memory catalog");
            Ok(Arc::new(store::catalog::InMemoryCatalogStore::new()))
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn build_conjunction_store() -> Result<Arc<dyn ConjunctionStore>> {
    Ok(Arc::new(store::conjunction::InMemoryConjunctionStore::new()))
}

#[cfg(feature = "postgres")]
async fn build_conjunction_store() -> Result<Arc<dyn ConjunctionStore>> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let store = store::conjunction::PostgresConjunctionStore::connect(&url).await?;
            Ok(Arc::new(store))
        }
        Err(_) => {
            tracing::warn!("postgres feature enabled but DATABASE_URL unset, falling back to in-memory conjunctions");
            Ok(Arc::new(store::conjunction::InMemoryConjunctionStore::new()))
        }
    }
}
