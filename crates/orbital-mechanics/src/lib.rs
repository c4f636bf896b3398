//! Orbital Mechanics Library
//!
//! SGP4/SDP4 propagation and TLE-derived orbital elements for the
//! satellite conjunction screening engine. Wraps the `sgp4` crate behind
//! a `Satellite` catalog model and a `PropagatorCache` that builds one
//! propagator per catalog object and evaluates position/velocity in
//! parallel across a snapshot in time.

pub mod cache;
pub mod fixtures;
pub mod propagator;
pub mod satellite;

pub use cache::PropagatorCache;
pub use propagator::{Propagator, Pv};
pub use satellite::Satellite;

use thiserror::Error;

/// Mean Earth radius, km. Perigee/apogee altitudes are measured above this.
pub const EARTH_RADIUS_KM: f64 = 6378.137;

/// Standard gravitational parameter of Earth, km^3/s^2.
pub const EARTH_MU_KM3_S2: f64 = 398600.4418;

#[derive(Error, Debug)]
pub enum OrbitalError {
    #[error("invalid TLE: {0}")]
    InvalidTle(String),
    #[error("eccentricity {0} out of range [0, 1)")]
    EccentricityOutOfRange(f64),
    #[error("propagation failed: {0}")]
    PropagationFailed(String),
}

pub type Result<T> = std::result::Result<T, OrbitalError>;
