//! External collaborator storage. The core screening crate never owns
//! persistence; it depends only on `collision_avoidance::{CatalogSource,
//! ConjunctionSink}`, which the stores here implement through a sync
//! adapter over their async surface.

pub mod catalog;
pub mod conjunction;

pub use catalog::CatalogStore;
pub use conjunction::ConjunctionStore;
