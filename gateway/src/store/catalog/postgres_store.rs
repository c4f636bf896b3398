//! Persisted catalog store backed by Postgres. Mirrors the shape of the
//! in-memory store behind the same `CatalogStore` trait; only compiled
//! with `--features postgres`.

use futures::future::BoxFuture;
use orbital_mechanics::Satellite;
use sqlx::{PgPool, Row};

use super::CatalogStore;

pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_satellite(row: &sqlx::postgres::PgRow) -> anyhow::Result<Satellite> {
    let cat_id: i32 = row.try_get("cat_id")?;
    let tle_line1: String = row.try_get("tle_line1")?;
    let tle_line2: String = row.try_get("tle_line2")?;
    Satellite::from_tle(cat_id as u32, &tle_line1, &tle_line2)
        .map_err(|e| anyhow::anyhow!("stored TLE for cat_id {cat_id} failed to parse: {e}"))
}

impl CatalogStore for PostgresCatalogStore {
    fn all(&self) -> BoxFuture<'_, anyhow::Result<Vec<Satellite>>> {
        Box::pin(async move {
            let rows = sqlx::query("SELECT cat_id, tle_line1, tle_line2 FROM satellites")
                .fetch_all(&self.pool)
                .await?;
            rows.iter().map(row_to_satellite).collect()
        })
    }

    fn count(&self) -> BoxFuture<'_, anyhow::Result<i64>> {
        Box::pin(async move {
            let row = sqlx::query("SELECT COUNT(*) AS n FROM satellites")
                .fetch_one(&self.pool)
                .await?;
            Ok(row.try_get::<i64, _>("n")?)
        })
    }

    fn find(&self, cat_id: u32) -> BoxFuture<'_, anyhow::Result<Option<Satellite>>> {
        Box::pin(async move {
            let row = sqlx::query("SELECT cat_id, tle_line1, tle_line2 FROM satellites WHERE cat_id = $1")
                .bind(cat_id as i32)
                .fetch_optional(&self.pool)
                .await?;
            row.as_ref().map(row_to_satellite).transpose()
        })
    }

    fn save_all(&self, satellites: Vec<Satellite>) -> BoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            let mut tx = self.pool.begin().await?;
            for sat in &satellites {
                sqlx::query(
                    "INSERT INTO satellites (cat_id, tle_line1, tle_line2) VALUES ($1, $2, $3)
                     ON CONFLICT (cat_id) DO UPDATE SET tle_line1 = EXCLUDED.tle_line1, tle_line2 = EXCLUDED.tle_line2",
                )
                .bind(sat.cat_id as i32)
                .bind(&sat.tle_line1)
                .bind(&sat.tle_line2)
                .execute(&mut *tx)
                .await?;
            }
            tx.commit().await?;
            Ok(())
        })
    }

    fn delete_by_cat_id_not_in(&self, keep: Vec<u32>) -> BoxFuture<'_, anyhow::Result<u64>> {
        Box::pin(async move {
            let keep: Vec<i32> = keep.into_iter().map(|id| id as i32).collect();
            let result = sqlx::query("DELETE FROM satellites WHERE NOT (cat_id = ANY($1))")
                .bind(&keep)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected())
        })
    }
}
