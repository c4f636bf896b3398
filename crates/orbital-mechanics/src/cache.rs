//! One propagator per catalog object, built once per screening run and
//! evaluated in parallel across the catalog at a given instant.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::propagator::{Propagator, Pv};
use crate::satellite::Satellite;

pub struct PropagatorCache;

impl PropagatorCache {
    /// Build one propagator per satellite. Rejects eccentricity >= 1
    /// satellites up front and catches any other construction failure
    /// (TLE-derived elements that `sgp4::Constants` refuses); both are
    /// folded into a single skipped-count warning, not a hard error.
    pub fn build(satellites: &[Satellite]) -> HashMap<u32, Propagator> {
        let mut skipped = 0usize;
        let mut cache = HashMap::with_capacity(satellites.len());

        for sat in satellites {
            if !(0.0..1.0).contains(&sat.eccentricity) {
                skipped += 1;
                continue;
            }
            match Propagator::from_satellite(sat) {
                Ok(propagator) => {
                    cache.insert(sat.cat_id, propagator);
                }
                Err(_) => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(
                skipped,
                total = satellites.len(),
                "propagator cache: skipped satellites that failed to build"
            );
        }

        cache
    }

    /// Propagate every cached satellite to `at` in parallel. A satellite
    /// whose propagation fails (numerical blow-up, epoch too far from
    /// validity) is simply absent from the returned snapshot.
    pub fn propagate_all(cache: &HashMap<u32, Propagator>, at: DateTime<Utc>) -> HashMap<u32, Pv> {
        cache
            .par_iter()
            .filter_map(|(cat_id, propagator)| propagator.pv(at).ok().map(|pv| (*cat_id, pv)))
            .collect()
    }
}
