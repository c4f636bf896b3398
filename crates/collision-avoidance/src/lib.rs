//! Satellite Conjunction Screening
//!
//! The three-stage screening pipeline: pair reduction (a geometric
//! prefilter over orbital shells), a coarse time-stepped sweep, and
//! event clustering + refinement down to a time of closest approach and
//! miss distance per pair. See [`orchestrator::run_screening`] for the
//! entrypoint that wires the stages together.

pub mod cluster;
pub mod config;
pub mod domain;
pub mod orchestrator;
pub mod pair_reducer;
pub mod refine;
pub mod store;
pub mod sweep;

pub use config::ScreeningConfig;
pub use domain::{Conjunction, CoarseDetection, Event, SatellitePair};
pub use store::{CatalogSource, ConjunctionSink};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreeningError {
    #[error("catalog store error: {0}")]
    CatalogStore(String),
    #[error("conjunction store error: {0}")]
    ConjunctionStore(String),
}

pub type Result<T> = std::result::Result<T, ScreeningError>;
