use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::debug;

use super::ports::CollectionLogRepository;
use crate::domain::{
    day::CollectionDay,
    household::HouseholdId,
    status::{CollectionStatus, DaySummary},
};
use crate::error::{CollectionError, Result};

/// Advisory lock key taken for the duration of a seeding transaction so
/// concurrent seeders for the same day cannot both insert.
const SEED_LOCK_KEY: i64 = 0x7761_7374_6573_6564;

#[derive(Debug, Clone)]
pub struct PostgresCollectionLogRepository {
    pool: PgPool,
}

impl PostgresCollectionLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CollectionLogRepository for PostgresCollectionLogRepository {
    async fn mark_collected(
        &self,
        household_id: &HouseholdId,
        day: CollectionDay,
        collector_name: &str,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE collection_logs
            SET
                status = 'collected',
                collector_name = $2,
                collected_on = $3
            WHERE household_id = $1
              AND ((collected_on AT TIME ZONE 'UTC')
                    + make_interval(mins => $4))::date = $5
              AND status = 'pending'
            "#,
        )
        .bind(household_id.as_str())
        .bind(collector_name)
        .bind(now)
        .bind(day.offset_minutes())
        .bind(day.date())
        .execute(self.pool())
        .await
        .map_err(|e| {
            CollectionError::from_sqlx("Failed to mark household collected", e)
        })?;

        Ok(result.rows_affected())
    }

    async fn status_for_day(
        &self,
        household_id: &HouseholdId,
        day: CollectionDay,
    ) -> Result<Option<CollectionStatus>> {
        let row = sqlx::query(
            r#"
            SELECT status
            FROM collection_logs
            WHERE household_id = $1
              AND ((collected_on AT TIME ZONE 'UTC')
                    + make_interval(mins => $2))::date = $3
            ORDER BY (status = 'collected') DESC, collected_on DESC
            LIMIT 1
            "#,
        )
        .bind(household_id.as_str())
        .bind(day.offset_minutes())
        .bind(day.date())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            CollectionError::from_sqlx("Failed to read collection status", e)
        })?;

        row.map(|row| {
            let status: String = row.try_get("status").map_err(|e| {
                CollectionError::Query(format!("Failed to read status: {e}"))
            })?;
            status.parse()
        })
        .transpose()
    }

    async fn seed_pending(
        &self,
        day: CollectionDay,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            CollectionError::from_sqlx("Failed to open seeding transaction", e)
        })?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SEED_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                CollectionError::from_sqlx("Failed to take seeding lock", e)
            })?;

        let result = sqlx::query(
            r#"
            INSERT INTO collection_logs (household_id, collected_on, status)
            SELECT h.household_id, $1, 'pending'
            FROM households h
            WHERE NOT EXISTS (
                SELECT 1
                FROM collection_logs cl
                WHERE cl.household_id = h.household_id
                  AND ((cl.collected_on AT TIME ZONE 'UTC')
                        + make_interval(mins => $2))::date = $3
            )
            "#,
        )
        .bind(now)
        .bind(day.offset_minutes())
        .bind(day.date())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            CollectionError::from_sqlx("Failed to insert pending logs", e)
        })?;

        tx.commit().await.map_err(|e| {
            CollectionError::from_sqlx("Failed to commit pending logs", e)
        })?;

        debug!(day = %day, inserted = result.rows_affected(), "seed statement finished");
        Ok(result.rows_affected())
    }

    async fn day_summary(&self, day: CollectionDay) -> Result<DaySummary> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'pending')   AS pending,
                COUNT(*) FILTER (WHERE status = 'collected') AS collected
            FROM collection_logs
            WHERE ((collected_on AT TIME ZONE 'UTC')
                    + make_interval(mins => $1))::date = $2
            "#,
        )
        .bind(day.offset_minutes())
        .bind(day.date())
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            CollectionError::from_sqlx("Failed to summarize collection day", e)
        })?;

        let read = |column: &str| -> Result<u64> {
            let count: i64 = row.try_get(column).map_err(|e| {
                CollectionError::Query(format!("Failed to read {column}: {e}"))
            })?;
            Ok(u64::try_from(count).unwrap_or_default())
        };

        Ok(DaySummary {
            pending: read("pending")?,
            collected: read("collected")?,
        })
    }

    async fn household_ids(&self) -> Result<Vec<HouseholdId>> {
        let rows = sqlx::query(
            "SELECT household_id FROM households ORDER BY household_id",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| CollectionError::from_sqlx("Failed to list households", e))?;

        rows.into_iter()
            .map(|row| {
                let raw: String = row.try_get("household_id").map_err(|e| {
                    CollectionError::Query(format!(
                        "Failed to read household_id: {e}"
                    ))
                })?;
                HouseholdId::parse(&raw)
            })
            .collect()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .map_err(|e| CollectionError::from_sqlx("Database ping failed", e))?;
        Ok(())
    }
}
