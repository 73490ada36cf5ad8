use std::{any::type_name_of_val, fmt, sync::Arc};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::day::{CollectionDay, DayBoundary};
use crate::{database::ports::CollectionLogRepository, error::Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub day: chrono::NaiveDate,
    pub inserted: u64,
}

/// Ensures every household has a `pending` log for the current collection
/// day. Runs once per process start; it is not rescheduled when the process
/// outlives a day boundary.
#[derive(Clone)]
pub struct DailySeeder<R>
where
    R: CollectionLogRepository + ?Sized,
{
    repository: Arc<R>,
    boundary: DayBoundary,
}

impl<R> fmt::Debug for DailySeeder<R>
where
    R: CollectionLogRepository + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DailySeeder")
            .field("repository", &type_name_of_val(self.repository.as_ref()))
            .field("boundary", &self.boundary)
            .finish()
    }
}

impl<R> DailySeeder<R>
where
    R: CollectionLogRepository + ?Sized,
{
    pub fn new(repository: Arc<R>, boundary: DayBoundary) -> Self {
        Self {
            repository,
            boundary,
        }
    }

    pub async fn seed(&self) -> Result<SeedReport> {
        self.seed_at(Utc::now()).await
    }

    pub async fn seed_at(&self, now: DateTime<Utc>) -> Result<SeedReport> {
        let day: CollectionDay = self.boundary.day_of(now);
        let inserted = self.repository.seed_pending(day, now).await?;

        if inserted > 0 {
            info!(day = %day, inserted, "inserted pending logs for today");
        } else {
            info!(day = %day, "pending logs for today already present");
        }

        Ok(SeedReport {
            day: day.date(),
            inserted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryCollectionLogRepository;
    use crate::domain::{
        collection::{CollectOutcome, CollectionService},
        household::HouseholdId,
        status::CollectionStatus,
    };
    use crate::error::CollectionError;
    use chrono::{NaiveDate, TimeZone};

    fn repo() -> Arc<InMemoryCollectionLogRepository> {
        Arc::new(InMemoryCollectionLogRepository::with_households([
            "H001", "H002", "H003",
        ]))
    }

    #[tokio::test]
    async fn seeds_one_pending_row_per_household() {
        let repo = repo();
        let seeder = DailySeeder::new(repo.clone(), DayBoundary::ist());
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 3, 0, 0).unwrap();

        let report = seeder.seed_at(now).await.unwrap();

        assert_eq!(report.inserted, 3);
        assert_eq!(report.day, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        let logs = repo.logs().await;
        assert!(logs.iter().all(|l| l.status == CollectionStatus::Pending));
        assert!(logs.iter().all(|l| l.collected_on == now));
    }

    #[tokio::test]
    async fn second_run_same_day_inserts_nothing() {
        let repo = repo();
        let seeder = DailySeeder::new(repo.clone(), DayBoundary::ist());

        let first = seeder
            .seed_at(Utc.with_ymd_and_hms(2025, 3, 14, 3, 0, 0).unwrap())
            .await
            .unwrap();
        // 18:00 UTC is still the 14th in IST.
        let second = seeder
            .seed_at(Utc.with_ymd_and_hms(2025, 3, 14, 18, 0, 0).unwrap())
            .await
            .unwrap();

        assert_eq!(first.inserted, 3);
        assert_eq!(second.inserted, 0);
        assert_eq!(repo.logs().await.len(), 3);
    }

    #[tokio::test]
    async fn crossing_regional_midnight_seeds_a_new_day() {
        let repo = repo();
        let seeder = DailySeeder::new(repo.clone(), DayBoundary::ist());

        seeder
            .seed_at(Utc.with_ymd_and_hms(2025, 3, 14, 3, 0, 0).unwrap())
            .await
            .unwrap();
        // 18:45 UTC on the 14th is 00:15 IST on the 15th.
        let next = seeder
            .seed_at(Utc.with_ymd_and_hms(2025, 3, 14, 18, 45, 0).unwrap())
            .await
            .unwrap();

        assert_eq!(next.day, NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
        assert_eq!(next.inserted, 3);
    }

    #[tokio::test]
    async fn only_missing_households_are_seeded() {
        let repo = repo();
        let boundary = DayBoundary::ist();
        let seeder = DailySeeder::new(repo.clone(), boundary);
        let service = CollectionService::new(repo.clone(), boundary);
        let morning = Utc.with_ymd_and_hms(2025, 3, 14, 3, 0, 0).unwrap();

        seeder.seed_at(morning).await.unwrap();
        let h1 = HouseholdId::parse("H001").unwrap();
        assert_eq!(
            service.mark_collected_at(&h1, morning).await.unwrap(),
            CollectOutcome::Updated
        );

        repo.add_household("H004").await;
        let report = seeder.seed_at(morning).await.unwrap();

        assert_eq!(report.inserted, 1);
        // The collected row is not replaced by a fresh pending one.
        assert_eq!(
            service.mark_collected_at(&h1, morning).await.unwrap(),
            CollectOutcome::AlreadyCollected
        );
    }

    #[tokio::test]
    async fn storage_failure_is_returned_to_caller() {
        let repo = repo();
        repo.set_unavailable(true);
        let seeder = DailySeeder::new(repo, DayBoundary::ist());

        let err = seeder.seed().await.unwrap_err();
        assert!(matches!(err, CollectionError::StoreUnavailable(_)));
    }
}
