//! Core data model: pairs, coarse detections, events and the persisted
//! conjunction outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered pair (a, b) with `cat_id_a < cat_id_b`. Two pairs with the same
/// unordered members compare equal regardless of construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SatellitePair {
    pub cat_id_a: u32,
    pub cat_id_b: u32,
}

impl SatellitePair {
    pub fn new(x: u32, y: u32) -> Self {
        if x < y {
            SatellitePair { cat_id_a: x, cat_id_b: y }
        } else {
            SatellitePair { cat_id_a: y, cat_id_b: x }
        }
    }
}

/// One below-tolerance sample from the coarse sweep.
#[derive(Debug, Clone, Copy)]
pub struct CoarseDetection {
    pub pair: SatellitePair,
    pub time: DateTime<Utc>,
    pub distance_km: f64,
}

/// A contiguous run of `CoarseDetection`s for one pair, representing a
/// single approach. Non-empty and time-sorted by construction (see
/// [`crate::cluster::cluster`]).
#[derive(Debug, Clone)]
pub struct Event {
    pub pair: SatellitePair,
    pub detections: Vec<CoarseDetection>,
}

impl Event {
    /// First sample time. Panics if `detections` is empty, which should
    /// never happen for an `Event` produced by `cluster`.
    pub fn t_min(&self) -> DateTime<Utc> {
        self.detections.first().expect("event has no detections").time
    }

    /// Last sample time.
    pub fn t_max(&self) -> DateTime<Utc> {
        self.detections.last().expect("event has no detections").time
    }
}

/// A refined, persisted conjunction outcome. `id` is assigned by the
/// store on insert; `None` until then.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conjunction {
    pub id: Option<i64>,
    pub cat_id_a: u32,
    pub cat_id_b: u32,
    pub miss_km: f64,
    pub tca: DateTime<Utc>,
    pub rel_speed_m_s: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_order_independent() {
        assert_eq!(SatellitePair::new(5, 3), SatellitePair::new(3, 5));
    }

    #[test]
    fn pair_antireflexive_construction_still_orders() {
        let p = SatellitePair::new(10, 10);
        assert_eq!(p.cat_id_a, 10);
        assert_eq!(p.cat_id_b, 10);
    }
}
