//! A single satellite's propagator: wraps `sgp4::Constants` and exposes
//! `pv(t)` in an inertial frame (TEME for SGP4), metres and m/s.

use chrono::{DateTime, Utc};
use nalgebra::Vector3;

use crate::satellite::Satellite;
use crate::{OrbitalError, Result};

/// Position and velocity at an instant, inertial frame, metres and m/s.
#[derive(Debug, Clone, Copy)]
pub struct Pv {
    pub position_m: Vector3<f64>,
    pub velocity_m_s: Vector3<f64>,
}

impl Pv {
    /// Euclidean distance between two samples, in kilometres. Converts to
    /// kilometres before subtracting to keep the subtraction in a
    /// numerically comfortable range.
    pub fn distance_km(&self, other: &Pv) -> f64 {
        let a_km = self.position_m / 1000.0;
        let b_km = other.position_m / 1000.0;
        (a_km - b_km).norm()
    }

    /// Relative speed between two samples, in m/s.
    pub fn relative_speed_m_s(&self, other: &Pv) -> f64 {
        (self.velocity_m_s - other.velocity_m_s).norm()
    }
}

/// Opaque propagator for one catalog object. Stateless from the caller's
/// perspective: `pv` takes `&self` and may be called concurrently from
/// multiple threads once built.
pub struct Propagator {
    constants: sgp4::Constants,
    epoch_utc: DateTime<Utc>,
}

impl Propagator {
    /// Build from an already-validated `Satellite`. Constructs
    /// `sgp4::Elements` directly from the satellite's derived fields
    /// rather than re-parsing its TLE text — `mean_motion_dot`/`_ddot` are
    /// not used by the SGP4/SDP4 propagation equations themselves, so
    /// zeroing them here (as the upstream TLE's first/second derivative
    /// terms are historical artifacts of general-perturbations theory)
    /// loses no propagation fidelity.
    pub fn from_satellite(sat: &Satellite) -> Result<Self> {
        let elements = sgp4::Elements {
            object_name: None,
            international_designator: None,
            norad_id: sat.cat_id as u64,
            classification: sgp4::Classification::Unclassified,
            datetime: sat.epoch.naive_utc(),
            mean_motion_dot: 0.0,
            mean_motion_ddot: 0.0,
            drag_term: sat.bstar,
            element_set_number: 1,
            inclination: sat.inclination_deg,
            right_ascension: sat.raan_deg,
            eccentricity: sat.eccentricity,
            argument_of_perigee: sat.arg_perigee_deg,
            mean_anomaly: sat.mean_anomaly_deg,
            mean_motion: sat.mean_motion_rev_day,
            revolution_number: 1,
            ephemeris_type: 0,
        };

        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| OrbitalError::PropagationFailed(format!("{:?}", e)))?;

        Ok(Propagator {
            constants,
            epoch_utc: sat.epoch,
        })
    }

    /// Evaluate position/velocity at `t`. `sgp4` reports position/velocity
    /// in kilometres and kilometres/second; converted here to metres and
    /// m/s per the propagator's contract.
    pub fn pv(&self, t: DateTime<Utc>) -> Result<Pv> {
        let minutes_since_epoch = t.signed_duration_since(self.epoch_utc).num_milliseconds() as f64
            / 60_000.0;

        let prediction = self
            .constants
            .propagate(minutes_since_epoch)
            .map_err(|e| OrbitalError::PropagationFailed(format!("{:?}", e)))?;

        Ok(Pv {
            position_m: Vector3::new(
                prediction.position[0] * 1000.0,
                prediction.position[1] * 1000.0,
                prediction.position[2] * 1000.0,
            ),
            velocity_m_s: Vector3::new(
                prediction.velocity[0] * 1000.0,
                prediction.velocity[1] * 1000.0,
                prediction.velocity[2] * 1000.0,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::circular_tle;
    use crate::satellite::Satellite;

    #[test]
    fn propagates_to_plausible_radius() {
        let (l1, l2) = circular_tle(25544, 500.0, 51.6, 0.0, 0.0);
        let sat = Satellite::from_tle(25544, &l1, &l2).unwrap();
        let prop = Propagator::from_satellite(&sat).unwrap();
        let pv = prop.pv(sat.epoch).unwrap();

        let r_km = pv.position_m.norm() / 1000.0;
        // 500km altitude circular orbit -> radius ~6878km
        assert!((6000.0..7200.0).contains(&r_km), "unexpected radius {r_km}");
    }
}
