use std::{any::type_name_of_val, fmt, sync::Arc};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{
    day::{CollectionDay, DayBoundary},
    household::HouseholdId,
    status::{CollectionStatus, WEB_SCANNER_COLLECTOR},
};
use crate::{database::ports::CollectionLogRepository, error::Result};

/// Result of a scan. Every variant is a success from the caller's point of
/// view; only storage failures surface as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectOutcome {
    /// This scan moved today's row from `pending` to `collected`.
    Updated,
    /// Today's row was already `collected`; the scan was a duplicate.
    AlreadyCollected,
    /// No pending row and no collected row for today.
    Processed,
}

impl CollectOutcome {
    pub fn message(&self, household_id: &HouseholdId) -> String {
        match self {
            Self::Updated => format!(
                "Household {household_id} status updated to 'collected'."
            ),
            Self::AlreadyCollected => format!(
                "Household {household_id} has already been collected today."
            ),
            Self::Processed => {
                format!("Scan for Household {household_id} processed.")
            }
        }
    }
}

/// Marks households collected for the current collection day.
#[derive(Clone)]
pub struct CollectionService<R>
where
    R: CollectionLogRepository + ?Sized,
{
    repository: Arc<R>,
    boundary: DayBoundary,
    collector_name: String,
}

impl<R> fmt::Debug for CollectionService<R>
where
    R: CollectionLogRepository + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionService")
            .field("repository", &type_name_of_val(self.repository.as_ref()))
            .field("boundary", &self.boundary)
            .field("collector_name", &self.collector_name)
            .finish()
    }
}

impl<R> CollectionService<R>
where
    R: CollectionLogRepository + ?Sized,
{
    pub fn new(repository: Arc<R>, boundary: DayBoundary) -> Self {
        Self {
            repository,
            boundary,
            collector_name: WEB_SCANNER_COLLECTOR.to_string(),
        }
    }

    pub fn with_collector_name(mut self, name: impl Into<String>) -> Self {
        self.collector_name = name.into();
        self
    }

    pub fn boundary(&self) -> DayBoundary {
        self.boundary
    }

    pub fn today(&self) -> CollectionDay {
        self.boundary.today()
    }

    pub async fn mark_collected(
        &self,
        household_id: &HouseholdId,
    ) -> Result<CollectOutcome> {
        self.mark_collected_at(household_id, Utc::now()).await
    }

    pub async fn mark_collected_at(
        &self,
        household_id: &HouseholdId,
        now: DateTime<Utc>,
    ) -> Result<CollectOutcome> {
        let day = self.boundary.day_of(now);

        let affected = self
            .repository
            .mark_collected(household_id, day, &self.collector_name, now)
            .await?;

        if affected > 0 {
            if affected > 1 {
                warn!(
                    household_id = %household_id,
                    day = %day,
                    affected,
                    "several pending rows existed for one household and day"
                );
            }
            info!(household_id = %household_id, day = %day, "household marked collected");
            return Ok(CollectOutcome::Updated);
        }

        let outcome = match self
            .repository
            .status_for_day(household_id, day)
            .await?
        {
            Some(CollectionStatus::Collected) => CollectOutcome::AlreadyCollected,
            Some(CollectionStatus::Pending) | None => CollectOutcome::Processed,
        };

        match outcome {
            CollectOutcome::AlreadyCollected => {
                debug!(household_id = %household_id, day = %day, "duplicate scan")
            }
            _ => warn!(
                household_id = %household_id,
                day = %day,
                "scan matched no log row for today; was seeding skipped?"
            ),
        }

        Ok(outcome)
    }
}
