//! Catalog ingestion: fetches TLEs from an upstream provider and upserts
//! them into the catalog store in batches, logging a failure row on any
//! upstream error rather than failing the whole process.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::store::CatalogStore;

#[derive(Debug, Clone)]
pub struct IngestionConfig {
    pub source_url: String,
    pub bearer_token: Option<String>,
    pub batch_size: usize,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct IngestionReport {
    pub fetched: usize,
    pub upserted: usize,
    pub succeeded: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamRecord {
    cat_id: u32,
    tle_line1: String,
    tle_line2: String,
}

/// Fetch the full catalog from `config.source_url` and upsert it into
/// `store` in `batch_size`-sized chunks. Never returns `Err`: an upstream
/// fetch failure is folded into the returned report's `error` field so
/// the scheduler can log it and retry on the next tick (§7 — ingestion
/// failures are non-fatal to future runs).
pub async fn run_ingestion(
    client: &reqwest::Client,
    config: &IngestionConfig,
    store: &dyn CatalogStore,
) -> IngestionReport {
    let started_at = Utc::now();

    match fetch_and_upsert(client, config, store).await {
        Ok((fetched, upserted)) => IngestionReport {
            fetched,
            upserted,
            succeeded: true,
            started_at,
            finished_at: Utc::now(),
            error: None,
        },
        Err(e) => {
            tracing::error!(error = %e, "ingestion failed, will retry on next scheduled tick");
            IngestionReport {
                fetched: 0,
                upserted: 0,
                succeeded: false,
                started_at,
                finished_at: Utc::now(),
                error: Some(e.to_string()),
            }
        }
    }
}

async fn fetch_and_upsert(
    client: &reqwest::Client,
    config: &IngestionConfig,
    store: &dyn CatalogStore,
) -> anyhow::Result<(usize, usize)> {
    let mut request = client.get(&config.source_url);
    if let Some(token) = &config.bearer_token {
        request = request.bearer_auth(token);
    }

    let records: Vec<UpstreamRecord> = request.send().await?.error_for_status()?.json().await?;
    let fetched = records.len();

    let mut upserted = 0usize;
    for chunk in records.chunks(config.batch_size.max(1)) {
        let satellites: Vec<orbital_mechanics::Satellite> = chunk
            .iter()
            .filter_map(|r| {
                orbital_mechanics::Satellite::from_tle(r.cat_id, &r.tle_line1, &r.tle_line2)
                    .inspect_err(|e| tracing::warn!(cat_id = r.cat_id, error = %e, "skipping unparseable TLE during ingestion"))
                    .ok()
            })
            .collect();
        upserted += satellites.len();
        store.save_all(satellites).await?;
    }

    Ok((fetched, upserted))
}
