//! Groups a pair's coarse detections into contiguous temporal events: one
//! orbital pass produces several consecutive below-tolerance samples, a
//! later pass produces a fresh run separated by a gap of minutes to hours.

use std::collections::HashMap;

use chrono::Duration;

use crate::domain::{CoarseDetection, Event, SatellitePair};

/// Split each pair's time-sorted detections on any gap exceeding
/// `3 * step_s`. The 3x multiplier tolerates one dropped sample inside an
/// encounter without splitting it into two events.
pub fn cluster(detections: &[CoarseDetection], step_s: f64) -> HashMap<SatellitePair, Vec<Event>> {
    let mut by_pair: HashMap<SatellitePair, Vec<CoarseDetection>> = HashMap::new();
    for d in detections {
        by_pair.entry(d.pair).or_default().push(*d);
    }

    let gap_limit = Duration::milliseconds((3.0 * step_s * 1000.0).round() as i64);

    by_pair
        .into_iter()
        .map(|(pair, mut dets)| {
            dets.sort_by_key(|d| d.time);

            let mut events = Vec::new();
            let mut current: Vec<CoarseDetection> = Vec::new();
            for d in dets {
                if let Some(last) = current.last() {
                    if d.time - last.time > gap_limit {
                        events.push(Event { pair, detections: std::mem::take(&mut current) });
                    }
                }
                current.push(d);
            }
            if !current.is_empty() {
                events.push(Event { pair, detections: current });
            }

            (pair, events)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn det(pair: SatellitePair, secs: i64, d_km: f64) -> CoarseDetection {
        CoarseDetection {
            pair,
            time: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
            distance_km: d_km,
        }
    }

    #[test]
    fn preserves_all_input_detections_across_disjoint_events() {
        let pair = SatellitePair::new(1, 2);
        let dets = vec![
            det(pair, 0, 10.0),
            det(pair, 10, 9.0),
            det(pair, 20, 8.0),
            // gap > 3*10s = 30s
            det(pair, 1000, 11.0),
            det(pair, 1010, 10.5),
        ];

        let events = cluster(&dets, 10.0);
        let events = &events[&pair];
        assert_eq!(events.len(), 2);

        let total: usize = events.iter().map(|e| e.detections.len()).sum();
        assert_eq!(total, dets.len());

        for e in events {
            assert!(!e.detections.is_empty());
            let sorted = e.detections.windows(2).all(|w| w[0].time <= w[1].time);
            assert!(sorted);
        }
    }

    #[test]
    fn gap_exactly_at_threshold_does_not_split() {
        let pair = SatellitePair::new(1, 2);
        let dets = vec![det(pair, 0, 10.0), det(pair, 30, 9.0)]; // gap == 3*10s
        let events = cluster(&dets, 10.0);
        assert_eq!(events[&pair].len(), 1);
    }

    #[test]
    fn gap_one_second_over_threshold_splits() {
        let pair = SatellitePair::new(1, 2);
        let dets = vec![det(pair, 0, 10.0), det(pair, 31, 9.0)]; // gap == 3*10s + 1
        let events = cluster(&dets, 10.0);
        assert_eq!(events[&pair].len(), 2);
    }
}
