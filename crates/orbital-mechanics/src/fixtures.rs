//! Synthetic TLE generation for tests.
//!
//! Adapted from the constellation TLE generator: given a target altitude,
//! inclination and phasing, produces a valid checksummed TLE pair. Useful
//! for building the concrete screening scenarios (near-identical orbits,
//! head-on passes, far-apart shells) without depending on a live catalog.

use chrono::{Datelike, Timelike, Utc};

use crate::EARTH_MU_KM3_S2;
use crate::EARTH_RADIUS_KM;

fn tle_checksum(line: &str) -> u8 {
    (line
        .bytes()
        .take(68)
        .map(|b| {
            if b.is_ascii_digit() {
                (b - b'0') as u16
            } else if b == b'-' {
                1u16
            } else {
                0u16
            }
        })
        .sum::<u16>()
        % 10) as u8
}

fn format_tle_line1(norad_id: u32, epoch_year: u8, epoch_day: f64) -> String {
    let line = format!(
        "1 {:05}U 00000A   {:02}{:012.8}  .00000000  00000-0  00000-0 0    1",
        norad_id, epoch_year, epoch_day
    );
    let cksum = tle_checksum(&line);
    format!("{}{}", line, cksum)
}

fn format_tle_line2(
    norad_id: u32,
    inc_deg: f64,
    raan_deg: f64,
    eccentricity: f64,
    arg_perigee_deg: f64,
    mean_anomaly_deg: f64,
    mean_motion: f64,
) -> String {
    let ecc_int = (eccentricity * 10_000_000.0).round() as u64;
    let line = format!(
        "2 {:05} {:>8.4} {:>8.4} {:07} {:>8.4} {:>8.4} {:>11.8}{:05}",
        norad_id, inc_deg, raan_deg, ecc_int, arg_perigee_deg, mean_anomaly_deg, mean_motion, 1u32,
    );
    let cksum = tle_checksum(&line);
    format!("{}{}", line, cksum)
}

/// A valid checksummed TLE pair for a near-circular orbit at the given
/// altitude/inclination/RAAN/mean-anomaly, epoch now.
pub fn circular_tle(
    norad_id: u32,
    altitude_km: f64,
    inclination_deg: f64,
    raan_deg: f64,
    mean_anomaly_deg: f64,
) -> (String, String) {
    let now = Utc::now();
    let epoch_year = (now.year() % 100) as u8;
    let epoch_day = now.ordinal() as f64
        + now.hour() as f64 / 24.0
        + now.minute() as f64 / 1440.0
        + now.second() as f64 / 86400.0;

    let semi_major_km = EARTH_RADIUS_KM + altitude_km;
    let n_rad_s = (EARTH_MU_KM3_S2 / semi_major_km.powi(3)).sqrt();
    let mean_motion = n_rad_s * 86400.0 / (2.0 * std::f64::consts::PI);

    let line1 = format_tle_line1(norad_id, epoch_year, epoch_day);
    let line2 = format_tle_line2(
        norad_id,
        inclination_deg,
        raan_deg,
        0.0001,
        0.0,
        mean_anomaly_deg,
        mean_motion,
    );
    (line1, line2)
}

/// `sgp4::Elements` for a record whose eccentricity is >= 1 (hyperbolic /
/// decayed). The 7-digit TLE eccentricity field cannot itself encode this,
/// so this bypasses TLE text entirely — construct the element set directly,
/// as `Satellite::from_elements` allows.
pub fn decayed_elements(norad_id: u32) -> sgp4::Elements {
    sgp4::Elements {
        object_name: None,
        international_designator: None,
        norad_id: norad_id as u64,
        classification: sgp4::Classification::Unclassified,
        datetime: Utc::now().naive_utc(),
        mean_motion_dot: 0.0,
        mean_motion_ddot: 0.0,
        drag_term: 0.0,
        element_set_number: 1,
        inclination: 51.6,
        right_ascension: 0.0,
        eccentricity: 1.01,
        argument_of_perigee: 0.0,
        mean_anomaly: 0.0,
        mean_motion: 15.0,
        revolution_number: 1,
        ephemeris_type: 0,
    }
}
