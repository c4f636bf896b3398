//! Catalog object model: a satellite identified by NORAD catalog number,
//! its canonical TLE, and the orbital elements/altitudes derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{OrbitalError, Result, EARTH_MU_KM3_S2, EARTH_RADIUS_KM};

/// Catalog object identified by an integer catalog number.
///
/// `tle_line1`/`tle_line2` are the canonical state; every other field is
/// derived from them at parse time and kept alongside so downstream code
/// (pair reduction in particular) never has to re-parse the TLE.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Satellite {
    pub cat_id: u32,
    pub tle_line1: String,
    pub tle_line2: String,

    pub mean_motion_rev_day: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub arg_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
    pub bstar: f64,

    pub perigee_alt_km: f64,
    pub apogee_alt_km: f64,

    pub epoch: DateTime<Utc>,
}

impl Satellite {
    /// Parse a TLE pair and derive orbital elements and altitudes.
    pub fn from_tle(cat_id: u32, tle_line1: &str, tle_line2: &str) -> Result<Self> {
        let elements = sgp4::Elements::from_tle(None, tle_line1.as_bytes(), tle_line2.as_bytes())
            .map_err(|e| OrbitalError::InvalidTle(format!("{:?}", e)))?;

        Self::from_elements(cat_id, &elements, tle_line1.to_string(), tle_line2.to_string())
    }

    /// Build directly from a parsed `sgp4::Elements`, bypassing the TLE
    /// text round-trip. Used by `from_tle` and by fixtures that need to
    /// construct elements outside the TLE format's own constraints (e.g.
    /// a synthetic record with eccentricity >= 1, which the 7-digit TLE
    /// eccentricity field cannot itself encode).
    ///
    /// Invariants enforced here: eccentricity in `[0, 1)` and
    /// `perigee_alt_km <= apogee_alt_km`. The latter falls out for free
    /// once eccentricity is valid, since both are computed from the same
    /// semi-major axis.
    pub fn from_elements(
        cat_id: u32,
        elements: &sgp4::Elements,
        tle_line1: String,
        tle_line2: String,
    ) -> Result<Self> {
        let eccentricity = elements.eccentricity;
        if !(0.0..1.0).contains(&eccentricity) {
            return Err(OrbitalError::EccentricityOutOfRange(eccentricity));
        }

        let mean_motion_rad_s = elements.mean_motion * 2.0 * std::f64::consts::PI / 86400.0;
        let semi_major_km = (EARTH_MU_KM3_S2 / mean_motion_rad_s.powi(2)).cbrt();

        let perigee_alt_km = semi_major_km * (1.0 - eccentricity) - EARTH_RADIUS_KM;
        let apogee_alt_km = semi_major_km * (1.0 + eccentricity) - EARTH_RADIUS_KM;

        let epoch = DateTime::<Utc>::from_naive_utc_and_offset(elements.datetime, Utc);

        Ok(Satellite {
            cat_id,
            tle_line1,
            tle_line2,
            mean_motion_rev_day: elements.mean_motion,
            eccentricity,
            inclination_deg: elements.inclination,
            raan_deg: elements.right_ascension,
            arg_perigee_deg: elements.argument_of_perigee,
            mean_anomaly_deg: elements.mean_anomaly,
            bstar: elements.drag_term,
            perigee_alt_km,
            apogee_alt_km,
            epoch,
        })
    }

}
