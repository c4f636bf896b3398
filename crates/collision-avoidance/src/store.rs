//! Narrow interfaces to the two external collaborators the orchestrator
//! actually touches. The core never owns persistence: the catalog store
//! is read-only here (ingestion owns writes, and lives in the gateway
//! crate), and the conjunction sink only needs the closest-so-far upsert.
//! Query/paging and catalog mutation are gateway-only concerns layered on
//! top of a concrete store's own inherent methods.

use orbital_mechanics::Satellite;

use crate::domain::Conjunction;
use crate::ScreeningError;

pub trait CatalogSource: Send + Sync {
    /// The full catalog as of now.
    fn all(&self) -> std::result::Result<Vec<Satellite>, ScreeningError>;
}

pub trait ConjunctionSink: Send + Sync {
    /// Upsert a batch of conjunctions under closest-so-far semantics: for
    /// each unordered pair, the stored miss distance only ever decreases.
    fn batch_upsert_if_closer(
        &self,
        conjunctions: &[Conjunction],
    ) -> std::result::Result<(), ScreeningError>;
}
