use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    day::CollectionDay,
    household::HouseholdId,
    status::{CollectionStatus, DaySummary},
};
use crate::error::Result;

#[async_trait]
pub trait CollectionLogRepository: Send + Sync {
    /// Flip the household's `pending` row for `day` to `collected`.
    ///
    /// The `status = 'pending'` condition must be evaluated atomically with
    /// the write; the returned row count is the only signal of whether this
    /// call changed state.
    async fn mark_collected(
        &self,
        household_id: &HouseholdId,
        day: CollectionDay,
        collector_name: &str,
        now: DateTime<Utc>,
    ) -> Result<u64>;

    /// Status of the household's row for `day`. When several rows exist a
    /// `collected` one wins.
    async fn status_for_day(
        &self,
        household_id: &HouseholdId,
        day: CollectionDay,
    ) -> Result<Option<CollectionStatus>>;

    /// Insert a `pending` row stamped `now` for every household without a
    /// row on `day`. Returns the number of rows inserted.
    async fn seed_pending(
        &self,
        day: CollectionDay,
        now: DateTime<Utc>,
    ) -> Result<u64>;

    async fn day_summary(&self, day: CollectionDay) -> Result<DaySummary>;

    /// Every registered household, ordered by id.
    async fn household_ids(&self) -> Result<Vec<HouseholdId>>;

    /// Cheap round trip used by health checks.
    async fn ping(&self) -> Result<()>;
}
