//! Screening configuration. Mirrors the `tolerance_km` / `threshold_km` /
//! `lookahead_hours` / `step_seconds` table from the external config
//! surface; `batch_size` and `ingestion.schedule.cron` live with
//! ingestion, not here, since the core never ingests.

#[derive(Debug, Clone, Copy)]
pub struct ScreeningConfig {
    /// Coarse-sweep detection cutoff; also used by pair reduction.
    pub tolerance_km: f64,
    /// Final conjunction cutoff after refinement.
    pub threshold_km: f64,
    /// Forward prediction window from run start, in hours.
    pub lookahead_hours: f64,
    /// Coarse sweep time step, in seconds.
    pub step_seconds: f64,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            tolerance_km: 50.0,
            threshold_km: 5.0,
            lookahead_hours: 24.0,
            step_seconds: 3.0,
        }
    }
}
