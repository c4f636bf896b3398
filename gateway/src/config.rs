//! Gateway configuration, loaded from environment variables with the same
//! `std::env::var(..).unwrap_or_else(..)` idiom used for the server port.

use collision_avoidance::ScreeningConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: String,
    pub screening: ScreeningConfig,
    pub batch_size: usize,
    pub ingestion_cron: String,
    pub catalog_source_url: Option<String>,
    pub catalog_source_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("ORBITAL_GATEWAY_PORT")
            .or_else(|_| std::env::var("PORT"))
            .unwrap_or_else(|_| "18700".to_string());

        let screening = ScreeningConfig {
            tolerance_km: env_f64("SCREENING_TOLERANCE_KM", 50.0),
            threshold_km: env_f64("SCREENING_THRESHOLD_KM", 5.0),
            lookahead_hours: env_f64("SCREENING_LOOKAHEAD_HOURS", 24.0),
            step_seconds: env_f64("SCREENING_STEP_SECONDS", 3.0),
        };

        let batch_size = std::env::var("INGESTION_BATCH_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000);

        // 21 minutes past every sixth hour.
        let ingestion_cron =
            std::env::var("INGESTION_SCHEDULE_CRON").unwrap_or_else(|_| "0 21 */6 * * *".to_string());

        Self {
            port,
            screening,
            batch_size,
            ingestion_cron,
            catalog_source_url: std::env::var("CATALOG_SOURCE_URL").ok(),
            catalog_source_token: std::env::var("CATALOG_SOURCE_TOKEN").ok(),
        }
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
