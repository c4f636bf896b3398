//! Catalog storage: the read/write surface ingestion and the screening
//! orchestrator share. Default is an in-process map; the `postgres`
//! feature swaps in a persisted `sqlx` backend behind the same trait.

use std::collections::{HashMap, HashSet};

use futures::future::BoxFuture;
use orbital_mechanics::Satellite;
use tokio::sync::RwLock;

#[cfg(feature = "postgres")]
pub mod postgres_store;

#[cfg(feature = "postgres")]
pub use postgres_store::PostgresCatalogStore;

/// Read/write surface over the satellite catalog, matching the external
/// interfaces table exactly: `all`/`count`/`find` are the read side the
/// orchestrator depends on; `save_all`/`delete_by_cat_id_not_in` are owned
/// by ingestion. Upsert is by catalog number.
pub trait CatalogStore: Send + Sync {
    fn all(&self) -> BoxFuture<'_, anyhow::Result<Vec<Satellite>>>;
    fn count(&self) -> BoxFuture<'_, anyhow::Result<i64>>;
    fn find(&self, cat_id: u32) -> BoxFuture<'_, anyhow::Result<Option<Satellite>>>;
    fn save_all(&self, satellites: Vec<Satellite>) -> BoxFuture<'_, anyhow::Result<()>>;
    fn delete_by_cat_id_not_in(&self, keep: Vec<u32>) -> BoxFuture<'_, anyhow::Result<u64>>;
}

/// In-process catalog store. Sufficient for a single-gateway deployment
/// without a database, and for the orchestrator's own idempotence tests.
#[derive(Default)]
pub struct InMemoryCatalogStore {
    satellites: RwLock<HashMap<u32, Satellite>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn all(&self) -> BoxFuture<'_, anyhow::Result<Vec<Satellite>>> {
        Box::pin(async move { Ok(self.satellites.read().await.values().cloned().collect()) })
    }

    fn count(&self) -> BoxFuture<'_, anyhow::Result<i64>> {
        Box::pin(async move { Ok(self.satellites.read().await.len() as i64) })
    }

    fn find(&self, cat_id: u32) -> BoxFuture<'_, anyhow::Result<Option<Satellite>>> {
        Box::pin(async move { Ok(self.satellites.read().await.get(&cat_id).cloned()) })
    }

    fn save_all(&self, satellites: Vec<Satellite>) -> BoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            let mut guard = self.satellites.write().await;
            for sat in satellites {
                guard.insert(sat.cat_id, sat);
            }
            Ok(())
        })
    }

    fn delete_by_cat_id_not_in(&self, keep: Vec<u32>) -> BoxFuture<'_, anyhow::Result<u64>> {
        Box::pin(async move {
            let keep: HashSet<u32> = keep.into_iter().collect();
            let mut guard = self.satellites.write().await;
            let before = guard.len();
            guard.retain(|cat_id, _| keep.contains(cat_id));
            Ok((before - guard.len()) as u64)
        })
    }
}

/// Bridges the gateway's async `CatalogStore` to the core's sync
/// `collision_avoidance::CatalogSource`. Used from inside the blocking
/// task the orchestrator runs in, never from an async handler directly.
pub struct SyncCatalogSource<'a> {
    pub store: &'a dyn CatalogStore,
}

impl collision_avoidance::CatalogSource for SyncCatalogSource<'_> {
    fn all(&self) -> std::result::Result<Vec<Satellite>, collision_avoidance::ScreeningError> {
        tokio::runtime::Handle::current()
            .block_on(self.store.all())
            .map_err(|e| collision_avoidance::ScreeningError::CatalogStore(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_satellite(cat_id: u32) -> Satellite {
        let (l1, l2) = orbital_mechanics::fixtures::circular_tle(cat_id, 500.0, 51.6, 0.0, 0.0);
        Satellite::from_tle(cat_id, &l1, &l2).unwrap()
    }

    #[tokio::test]
    async fn save_all_upserts_by_cat_id() {
        let store = InMemoryCatalogStore::new();
        let sat = test_satellite(1);
        store.save_all(vec![sat.clone()]).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);

        let mut updated = sat;
        updated.bstar = 0.001;
        store.save_all(vec![updated]).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_by_cat_id_not_in_prunes_missing_entries() {
        let store = InMemoryCatalogStore::new();
        store
            .save_all(vec![test_satellite(1), test_satellite(2), test_satellite(3)])
            .await
            .unwrap();

        let deleted = store.delete_by_cat_id_not_in(vec![1, 3]).await.unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(store.count().await.unwrap(), 2);
        assert!(store.find(2).await.unwrap().is_none());
    }
}
