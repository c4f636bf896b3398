//! Drives ingestion on a cron schedule. Screening itself is triggered
//! manually via the HTTP surface (§6: "triggered separately, manually in
//! the reference, but the design supports cron identically") — this
//! module only wires up the one cron job the spec names a default for.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler};

use crate::config::AppConfig;
use crate::ingestion::{self, IngestionConfig};
use crate::store::CatalogStore;

/// Start the ingestion cron job against `config.ingestion_cron`. Returns
/// the running scheduler; dropping it stops the job.
pub async fn start(
    config: &AppConfig,
    catalog: Arc<dyn CatalogStore>,
) -> anyhow::Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let Some(source_url) = config.catalog_source_url.clone() else {
        tracing::warn!("CATALOG_SOURCE_URL not set, ingestion scheduler disabled");
        return Ok(scheduler);
    };

    let ingestion_config = IngestionConfig {
        source_url,
        bearer_token: config.catalog_source_token.clone(),
        batch_size: config.batch_size,
    };

    let job = Job::new_async(config.ingestion_cron.as_str(), move |_uuid, _l| {
        let catalog = catalog.clone();
        let ingestion_config = ingestion_config.clone();
        Box::pin(async move {
            let client = reqwest::Client::new();
            let report = ingestion::run_ingestion(&client, &ingestion_config, catalog.as_ref()).await;
            tracing::info!(
                fetched = report.fetched,
                upserted = report.upserted,
                succeeded = report.succeeded,
                "scheduled ingestion tick complete"
            );
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(cron = %config.ingestion_cron, "ingestion scheduler started");
    Ok(scheduler)
}
