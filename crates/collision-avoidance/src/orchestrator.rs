//! Wires the four stages into one screening run: reduce, sweep, cluster,
//! refine, then a final dedup pass before handing results to the sink.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use orbital_mechanics::PropagatorCache;
use rayon::prelude::*;

use crate::config::ScreeningConfig;
use crate::domain::{Conjunction, Event, SatellitePair};
use crate::store::{CatalogSource, ConjunctionSink};
use crate::{cluster, pair_reducer, refine, sweep};
use crate::ScreeningError;

/// Run one full screening pass starting at `now` and return the number of
/// conjunctions upserted. Returns `Ok(0)` without touching the sink if the
/// catalog is empty, and skips any catalog entry whose propagator fails to
/// build rather than failing the whole run.
pub fn run_screening(
    catalog: &dyn CatalogSource,
    conjunctions: &dyn ConjunctionSink,
    config: &ScreeningConfig,
    now: DateTime<Utc>,
) -> Result<usize, ScreeningError> {
    let satellites = catalog.all()?;
    if satellites.is_empty() {
        tracing::info!("catalog empty, nothing to screen");
        return Ok(0);
    }

    let pairs = pair_reducer::reduce(&satellites, config.tolerance_km);
    tracing::info!(
        catalog_size = satellites.len(),
        candidate_pairs = pairs.len(),
        "pair reduction complete"
    );
    if pairs.is_empty() {
        return Ok(0);
    }

    let propagators = PropagatorCache::build(&satellites);
    if propagators.len() < satellites.len() {
        tracing::warn!(
            built = propagators.len(),
            catalog_size = satellites.len(),
            "some catalog entries could not be propagated and were skipped"
        );
    }

    let detections = sweep::sweep(
        &pairs,
        &propagators,
        now,
        config.tolerance_km,
        config.step_seconds,
        config.lookahead_hours,
    );
    // The candidate pair list is the peak-memory O(N^2) structure (§5); it
    // must not outlive the coarse sweep that's its only consumer.
    drop(pairs);
    tracing::info!(detections = detections.len(), "coarse sweep complete");
    if detections.is_empty() {
        return Ok(0);
    }

    let events_by_pair = cluster::cluster(&detections, config.step_seconds);
    let total_events: usize = events_by_pair.values().map(|v| v.len()).sum();
    tracing::info!(events = total_events, "event clustering complete");

    // Per-event refinement is independent and embarrassingly parallel (§5):
    // flatten across pairs first, then refine every event concurrently.
    let flattened: Vec<&Event> = events_by_pair.values().flatten().collect();
    let refined: Vec<Conjunction> = flattened
        .par_iter()
        .filter_map(|event| refine::refine(event, &propagators, config.step_seconds))
        .filter(|c| c.miss_km <= config.threshold_km)
        .collect();

    // Closest-so-far dedup within this run, keyed by unordered pair: an
    // orbit with multiple close passes in the same lookahead window keeps
    // only the lowest miss_km, tie-broken toward the earlier TCA.
    let mut best: HashMap<SatellitePair, Conjunction> = HashMap::new();
    for candidate in refined {
        let key = SatellitePair::new(candidate.cat_id_a, candidate.cat_id_b);
        best.entry(key)
            .and_modify(|existing| {
                if is_better(&candidate, existing) {
                    *existing = candidate.clone();
                }
            })
            .or_insert(candidate);
    }

    let results: Vec<Conjunction> = best.into_values().collect();
    tracing::info!(conjunctions = results.len(), "refinement complete");

    if results.is_empty() {
        return Ok(0);
    }

    conjunctions.batch_upsert_if_closer(&results)?;
    Ok(results.len())
}

fn is_better(candidate: &Conjunction, existing: &Conjunction) -> bool {
    if candidate.miss_km != existing.miss_km {
        candidate.miss_km < existing.miss_km
    } else {
        candidate.tca < existing.tca
    }
}
