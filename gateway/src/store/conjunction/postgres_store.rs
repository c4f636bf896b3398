//! Persisted conjunction store backed by Postgres. Only compiled with
//! `--features postgres`.

use collision_avoidance::Conjunction;
use futures::future::BoxFuture;
use sqlx::{PgPool, Row};

use super::{ConjunctionInfo, ConjunctionPage, ConjunctionStore};

const PAGE_SIZE: i64 = 50;

pub struct PostgresConjunctionStore {
    pool: PgPool,
}

impl PostgresConjunctionStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ConjunctionStore for PostgresConjunctionStore {
    fn batch_upsert_if_closer(&self, conjunctions: Vec<Conjunction>) -> BoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            let mut tx = self.pool.begin().await?;
            for c in &conjunctions {
                let (object1, object2) = if c.cat_id_a < c.cat_id_b {
                    (c.cat_id_a, c.cat_id_b)
                } else {
                    (c.cat_id_b, c.cat_id_a)
                };

                sqlx::query(
                    "INSERT INTO conjunctions
                        (object1_norad_id, object2_norad_id, miss_distance_km, time_of_closest_approach, relative_velocity_m_s)
                     VALUES ($1, $2, $3, $4, $5)
                     ON CONFLICT (object1_norad_id, object2_norad_id) DO UPDATE SET
                        miss_distance_km = EXCLUDED.miss_distance_km,
                        time_of_closest_approach = EXCLUDED.time_of_closest_approach,
                        relative_velocity_m_s = EXCLUDED.relative_velocity_m_s
                     WHERE conjunctions.miss_distance_km > EXCLUDED.miss_distance_km",
                )
                .bind(object1 as i32)
                .bind(object2 as i32)
                .bind(c.miss_km)
                .bind(c.tca)
                .bind(c.rel_speed_m_s)
                .execute(&mut *tx)
                .await?;
            }
            tx.commit().await?;
            Ok(())
        })
    }

    fn get_conjunctions(&self, page: u32, _with_formations: bool) -> BoxFuture<'_, anyhow::Result<ConjunctionPage>> {
        Box::pin(async move {
            let offset = page as i64 * PAGE_SIZE;
            let rows = sqlx::query(
                "SELECT id, object1_norad_id, object2_norad_id, miss_distance_km,
                        time_of_closest_approach, relative_velocity_m_s
                 FROM conjunctions
                 ORDER BY time_of_closest_approach
                 LIMIT $1 OFFSET $2",
            )
            .bind(PAGE_SIZE)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            let total_row = sqlx::query("SELECT COUNT(*) AS n FROM conjunctions")
                .fetch_one(&self.pool)
                .await?;
            let total: i64 = total_row.try_get("n")?;

            let items = rows
                .iter()
                .map(|row| {
                    Ok(ConjunctionInfo {
                        id: row.try_get("id")?,
                        object1_norad_id: row.try_get::<i32, _>("object1_norad_id")? as u32,
                        object2_norad_id: row.try_get::<i32, _>("object2_norad_id")? as u32,
                        miss_distance_km: row.try_get("miss_distance_km")?,
                        time_of_closest_approach: row.try_get("time_of_closest_approach")?,
                        relative_velocity_m_s: row.try_get("relative_velocity_m_s")?,
                    })
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            Ok(ConjunctionPage { items, page, total })
        })
    }
}
