//! Coarse sweep: a time-stepped, all-satellite propagation that records
//! every candidate pair whose distance drops below `tolerance_km`.
//!
//! Time is the outer loop and propagation is batched once per step, so
//! each propagator is evaluated once per step rather than once per pair
//! per step — this is what keeps the cost at
//! `O(satellites * steps) + O(pairs * steps)` cheap distance checks,
//! instead of `O(pairs * steps)` propagator calls.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use orbital_mechanics::{Propagator, PropagatorCache};
use rayon::prelude::*;

use crate::domain::{CoarseDetection, SatellitePair};

pub fn sweep(
    pairs: &[SatellitePair],
    propagators: &HashMap<u32, Propagator>,
    start: DateTime<Utc>,
    tolerance_km: f64,
    step_s: f64,
    lookahead_h: f64,
) -> Vec<CoarseDetection> {
    let n_steps = ((lookahead_h * 3600.0) / step_s).round().max(0.0) as u64;
    let log_every = (n_steps / 10).max(1);

    let mut detections = Vec::new();

    for k in 0..=n_steps {
        let t_k = start + step_duration(k, step_s);
        let positions = PropagatorCache::propagate_all(propagators, t_k);

        let mut step_detections: Vec<CoarseDetection> = pairs
            .par_iter()
            .filter_map(|pair| {
                let pa = positions.get(&pair.cat_id_a)?;
                let pb = positions.get(&pair.cat_id_b)?;
                let distance_km = pa.distance_km(pb);
                (distance_km < tolerance_km).then_some(CoarseDetection {
                    pair: *pair,
                    time: t_k,
                    distance_km,
                })
            })
            .collect();

        detections.append(&mut step_detections);

        if k % log_every == 0 {
            tracing::info!(
                step = k,
                total_steps = n_steps,
                detections = detections.len(),
                "coarse sweep progress"
            );
        }
    }

    detections
}

fn step_duration(k: u64, step_s: f64) -> Duration {
    Duration::milliseconds((k as f64 * step_s * 1000.0).round() as i64)
}
