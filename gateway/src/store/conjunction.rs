//! Conjunction storage: closest-so-far upsert plus a paged read surface
//! for the HTTP control surface.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use collision_avoidance::{Conjunction, SatellitePair};
use futures::future::BoxFuture;
use serde::Serialize;
use tokio::sync::RwLock;

#[cfg(feature = "postgres")]
pub mod postgres_store;

#[cfg(feature = "postgres")]
pub use postgres_store::PostgresConjunctionStore;

/// One page of conjunction rows, in the persisted shape from the external
/// interfaces table: `(id, object1_norad_id, object2_norad_id,
/// miss_distance_km, time_of_closest_approach, relative_velocity_m_s)`.
#[derive(Debug, Clone, Serialize)]
pub struct ConjunctionInfo {
    pub id: i64,
    pub object1_norad_id: u32,
    pub object2_norad_id: u32,
    pub miss_distance_km: f64,
    pub time_of_closest_approach: DateTime<Utc>,
    pub relative_velocity_m_s: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConjunctionPage {
    pub items: Vec<ConjunctionInfo>,
    pub page: u32,
    pub total: i64,
}

pub trait ConjunctionStore: Send + Sync {
    /// Upsert with the invariant: for each unordered pair, the stored miss
    /// distance only ever decreases.
    fn batch_upsert_if_closer(&self, conjunctions: Vec<Conjunction>) -> BoxFuture<'_, anyhow::Result<()>>;

    /// `with_formations` is accepted and ignored; the core never produces
    /// or reads them.
    fn get_conjunctions(&self, page: u32, with_formations: bool) -> BoxFuture<'_, anyhow::Result<ConjunctionPage>>;
}

const PAGE_SIZE: usize = 50;

#[derive(Default)]
pub struct InMemoryConjunctionStore {
    next_id: RwLock<i64>,
    rows: RwLock<HashMap<SatellitePair, ConjunctionInfo>>,
}

impl InMemoryConjunctionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConjunctionStore for InMemoryConjunctionStore {
    fn batch_upsert_if_closer(&self, conjunctions: Vec<Conjunction>) -> BoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            let mut rows = self.rows.write().await;
            let mut next_id = self.next_id.write().await;

            for c in conjunctions {
                let pair = SatellitePair::new(c.cat_id_a, c.cat_id_b);
                let closer = rows.get(&pair).map(|existing| c.miss_km < existing.miss_distance_km).unwrap_or(true);
                if !closer {
                    continue;
                }

                let id = rows.get(&pair).map(|existing| existing.id).unwrap_or_else(|| {
                    *next_id += 1;
                    *next_id
                });

                rows.insert(
                    pair,
                    ConjunctionInfo {
                        id,
                        object1_norad_id: pair.cat_id_a,
                        object2_norad_id: pair.cat_id_b,
                        miss_distance_km: c.miss_km,
                        time_of_closest_approach: c.tca,
                        relative_velocity_m_s: c.rel_speed_m_s,
                    },
                );
            }

            Ok(())
        })
    }

    fn get_conjunctions(&self, page: u32, _with_formations: bool) -> BoxFuture<'_, anyhow::Result<ConjunctionPage>> {
        Box::pin(async move {
            let rows = self.rows.read().await;
            let mut items: Vec<ConjunctionInfo> = rows.values().cloned().collect();
            items.sort_by(|a, b| a.time_of_closest_approach.cmp(&b.time_of_closest_approach));

            let total = items.len() as i64;
            let start = (page as usize) * PAGE_SIZE;
            let page_items = items.into_iter().skip(start).take(PAGE_SIZE).collect();

            Ok(ConjunctionPage { items: page_items, page, total })
        })
    }
}

/// Bridges the gateway's async `ConjunctionStore` to the core's sync
/// `collision_avoidance::ConjunctionSink`, for use inside the blocking
/// task the orchestrator runs in.
pub struct SyncConjunctionSink<'a> {
    pub store: &'a dyn ConjunctionStore,
}

impl collision_avoidance::ConjunctionSink for SyncConjunctionSink<'_> {
    fn batch_upsert_if_closer(
        &self,
        conjunctions: &[Conjunction],
    ) -> std::result::Result<(), collision_avoidance::ScreeningError> {
        tokio::runtime::Handle::current()
            .block_on(self.store.batch_upsert_if_closer(conjunctions.to_vec()))
            .map_err(|e| collision_avoidance::ScreeningError::ConjunctionStore(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn conj(a: u32, b: u32, miss_km: f64) -> Conjunction {
        Conjunction {
            id: None,
            cat_id_a: a,
            cat_id_b: b,
            miss_km,
            tca: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            rel_speed_m_s: 14_000.0,
        }
    }

    #[tokio::test]
    async fn upsert_keeps_only_the_closer_miss_distance() {
        let store = InMemoryConjunctionStore::new();
        store.batch_upsert_if_closer(vec![conj(1, 2, 10.0)]).await.unwrap();
        store.batch_upsert_if_closer(vec![conj(1, 2, 20.0)]).await.unwrap();

        let page = store.get_conjunctions(0, false).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].miss_distance_km, 10.0);
    }

    #[tokio::test]
    async fn upsert_replaces_when_strictly_closer() {
        let store = InMemoryConjunctionStore::new();
        store.batch_upsert_if_closer(vec![conj(1, 2, 10.0)]).await.unwrap();
        store.batch_upsert_if_closer(vec![conj(1, 2, 3.0)]).await.unwrap();

        let page = store.get_conjunctions(0, false).await.unwrap();
        assert_eq!(page.items[0].miss_distance_km, 3.0);
    }

    #[tokio::test]
    async fn pagination_respects_page_size() {
        let store = InMemoryConjunctionStore::new();
        let batch: Vec<Conjunction> = (0..75u32).map(|i| conj(i, i + 1000, 1.0)).collect();
        store.batch_upsert_if_closer(batch).await.unwrap();

        let first = store.get_conjunctions(0, false).await.unwrap();
        assert_eq!(first.items.len(), 50);
        assert_eq!(first.total, 75);

        let second = store.get_conjunctions(1, false).await.unwrap();
        assert_eq!(second.items.len(), 25);
    }
}
