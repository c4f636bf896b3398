//! HTTP control surface: `axum` router matching the external interfaces
//! table exactly.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::ingestion::{self, IngestionConfig, IngestionReport};
use crate::store::conjunction::ConjunctionPage;
use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/catalog/sync", post(catalog_sync))
        .route("/api/v1/catalog/stats", get(catalog_stats))
        .route("/api/v1/catalog/{cat_id}", get(catalog_get))
        .route("/api/v1/screening/run", post(screening_run))
        .route("/api/v1/conjunctions", get(list_conjunctions))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "orbital-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `POST /api/v1/catalog/sync` — 200 with a sync report on success, 500
/// with the same shape on failure.
async fn catalog_sync(State(state): State<AppState>) -> Result<Json<IngestionReport>, ApiError> {
    let Some(source_url) = state.config.catalog_source_url.clone() else {
        return Err(ApiError::internal("CATALOG_SOURCE_URL is not configured"));
    };

    let ingestion_config = IngestionConfig {
        source_url,
        bearer_token: state.config.catalog_source_token.clone(),
        batch_size: state.config.batch_size,
    };

    let report = ingestion::run_ingestion(&state.http_client, &ingestion_config, state.catalog.as_ref()).await;
    if report.succeeded {
        Ok(Json(report))
    } else {
        Err(ApiError {
            status: 500,
            error: "ingestion_failed".to_string(),
            details: report.error.clone().unwrap_or_default(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}

#[derive(Serialize)]
struct CatalogStats {
    #[serde(rename = "totalObjects")]
    total_objects: i64,
    timestamp: String,
}

async fn catalog_stats(State(state): State<AppState>) -> Result<Json<CatalogStats>, ApiError> {
    let total_objects = state.catalog.count().await?;
    Ok(Json(CatalogStats {
        total_objects,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

async fn catalog_get(
    State(state): State<AppState>,
    Path(cat_id): Path<u32>,
) -> Result<Json<orbital_mechanics::Satellite>, ApiError> {
    match state.catalog.find(cat_id).await? {
        Some(sat) => Ok(Json(sat)),
        None => Err(ApiError::not_found(format!("cat_id {cat_id} not found"))),
    }
}

#[derive(Serialize)]
struct ScreeningRunResponse {
    conjunctions_found: usize,
    started_at: String,
    finished_at: String,
}

async fn screening_run(State(state): State<AppState>) -> Result<Json<ScreeningRunResponse>, ApiError> {
    let started_at = Utc::now();
    let catalog = state.catalog.clone();
    let conjunctions = state.conjunctions.clone();
    let config = state.config.screening;

    let found = tokio::task::spawn_blocking(move || {
        let catalog_source = crate::store::catalog::SyncCatalogSource { store: catalog.as_ref() };
        let conjunction_sink = crate::store::conjunction::SyncConjunctionSink { store: conjunctions.as_ref() };
        collision_avoidance::orchestrator::run_screening(&catalog_source, &conjunction_sink, &config, Utc::now())
    })
    .await
    .map_err(|e| ApiError::internal(format!("screening task panicked: {e}")))??;

    Ok(Json(ScreeningRunResponse {
        conjunctions_found: found,
        started_at: started_at.to_rfc3339(),
        finished_at: Utc::now().to_rfc3339(),
    }))
}

#[derive(Deserialize)]
struct ConjunctionQuery {
    #[serde(default)]
    page: u32,
    #[serde(default, rename = "withFormations")]
    with_formations: bool,
}

async fn list_conjunctions(
    State(state): State<AppState>,
    Query(query): Query<ConjunctionQuery>,
) -> Result<Json<ConjunctionPage>, ApiError> {
    let page = state.conjunctions.get_conjunctions(query.page, query.with_formations).await?;
    Ok(Json(page))
}
