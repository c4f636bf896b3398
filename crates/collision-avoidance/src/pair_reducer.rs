//! Geometric prefilter: eliminates pairs whose orbital shells cannot
//! possibly come within `tolerance_km` of each other.

use orbital_mechanics::Satellite;
use rayon::prelude::*;

use crate::domain::SatellitePair;

/// For every unordered pair (i < j), emit it iff the perigee/apogee
/// altitude bands overlap once each endpoint is inflated by
/// `tolerance_km`: `max(pA, pB) - tolerance_km <= min(aA, aB) + tolerance_km`.
///
/// Necessary, not sufficient: two shells that don't overlap can never
/// approach within tolerance, but overlapping shells don't guarantee an
/// approach either (that's what the coarse sweep is for). Parallelized by
/// outer index, `O(n^2)` in catalog size.
pub fn reduce(satellites: &[Satellite], tolerance_km: f64) -> Vec<SatellitePair> {
    (0..satellites.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let a = &satellites[i];
            (i + 1..satellites.len()).filter_map(move |j| {
                let b = &satellites[j];
                let lo = a.perigee_alt_km.max(b.perigee_alt_km) - tolerance_km;
                let hi = a.apogee_alt_km.min(b.apogee_alt_km) + tolerance_km;
                if lo <= hi {
                    Some(SatellitePair::new(a.cat_id, b.cat_id))
                } else {
                    None
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbital_mechanics::fixtures::circular_tle;

    fn sat(cat_id: u32, altitude_km: f64) -> Satellite {
        let (l1, l2) = circular_tle(cat_id, altitude_km, 51.6, 0.0, 0.0);
        Satellite::from_tle(cat_id, &l1, &l2).unwrap()
    }

    #[test]
    fn overlapping_shells_are_kept() {
        let a = sat(1, 500.0);
        let b = sat(2, 520.0);
        let pairs = reduce(&[a, b], 50.0);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0], SatellitePair::new(1, 2));
    }

    #[test]
    fn disjoint_shells_beyond_tolerance_are_dropped() {
        let a = sat(1, 400.0);
        let b = sat(2, 1200.0);
        let pairs = reduce(&[a, b], 50.0);
        assert!(pairs.is_empty());
    }

    #[test]
    fn no_pair_is_reflexive_and_each_unordered_pair_appears_once() {
        let sats: Vec<Satellite> = (1..=5u32).map(|id| sat(id, 500.0 + id as f64)).collect();
        let pairs = reduce(&sats, 50.0);
        for p in &pairs {
            assert_ne!(p.cat_id_a, p.cat_id_b);
        }
        let mut seen = std::collections::HashSet::new();
        for p in &pairs {
            assert!(seen.insert((p.cat_id_a, p.cat_id_b)), "duplicate pair {:?}", p);
        }
        // 5 satellites all within a tight altitude band -> all 10 unordered pairs.
        assert_eq!(pairs.len(), 10);
    }
}
