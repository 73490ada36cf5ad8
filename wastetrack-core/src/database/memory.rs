//! In-memory [`CollectionLogRepository`] for tests and local experiments.

use std::{
    collections::BTreeSet,
    sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::ports::CollectionLogRepository;
use crate::domain::{
    day::CollectionDay,
    household::HouseholdId,
    status::{CollectionLog, CollectionStatus, DaySummary},
};
use crate::error::{CollectionError, Result};

#[derive(Debug, Default)]
pub struct InMemoryCollectionLogRepository {
    households: Mutex<BTreeSet<HouseholdId>>,
    logs: Mutex<Vec<CollectionLog>>,
    unavailable: AtomicBool,
}

impl InMemoryCollectionLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_households<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let households = ids
            .into_iter()
            .filter_map(|id| HouseholdId::parse(id.as_ref()).ok())
            .collect();
        Self {
            households: Mutex::new(households),
            ..Self::default()
        }
    }

    pub async fn add_household(&self, id: &str) {
        if let Ok(id) = HouseholdId::parse(id) {
            self.households.lock().await.insert(id);
        }
    }

    pub async fn insert_log(&self, log: CollectionLog) {
        self.logs.lock().await.push(log);
    }

    pub async fn logs(&self) -> Vec<CollectionLog> {
        self.logs.lock().await.clone()
    }

    /// Make every subsequent call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CollectionError::StoreUnavailable(
                "in-memory store switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CollectionLogRepository for InMemoryCollectionLogRepository {
    async fn mark_collected(
        &self,
        household_id: &HouseholdId,
        day: CollectionDay,
        collector_name: &str,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        self.check_available()?;
        let mut logs = self.logs.lock().await;
        let mut affected = 0;
        for log in logs.iter_mut().filter(|log| {
            &log.household_id == household_id
                && day.contains(log.collected_on)
                && log.status == CollectionStatus::Pending
        }) {
            log.status = CollectionStatus::Collected;
            log.collector_name = Some(collector_name.to_string());
            log.collected_on = now;
            affected += 1;
        }
        Ok(affected)
    }

    async fn status_for_day(
        &self,
        household_id: &HouseholdId,
        day: CollectionDay,
    ) -> Result<Option<CollectionStatus>> {
        self.check_available()?;
        let logs = self.logs.lock().await;
        let mut statuses = logs
            .iter()
            .filter(|log| {
                &log.household_id == household_id
                    && day.contains(log.collected_on)
            })
            .map(|log| log.status)
            .peekable();

        if statuses.peek().is_none() {
            return Ok(None);
        }
        let statuses: Vec<_> = statuses.collect();
        if statuses.contains(&CollectionStatus::Collected) {
            Ok(Some(CollectionStatus::Collected))
        } else {
            Ok(statuses.first().copied())
        }
    }

    async fn seed_pending(
        &self,
        day: CollectionDay,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        self.check_available()?;
        let households = self.households.lock().await;
        let mut logs = self.logs.lock().await;
        let missing: Vec<HouseholdId> = households
            .iter()
            .filter(|id| {
                !logs.iter().any(|log| {
                    &log.household_id == *id && day.contains(log.collected_on)
                })
            })
            .cloned()
            .collect();

        let inserted = missing.len() as u64;
        logs.extend(
            missing
                .into_iter()
                .map(|id| CollectionLog::pending(id, now)),
        );
        Ok(inserted)
    }

    async fn day_summary(&self, day: CollectionDay) -> Result<DaySummary> {
        self.check_available()?;
        let logs = self.logs.lock().await;
        Ok(logs
            .iter()
            .filter(|log| day.contains(log.collected_on))
            .fold(DaySummary::default(), |mut summary, log| {
                match log.status {
                    CollectionStatus::Pending => summary.pending += 1,
                    CollectionStatus::Collected => summary.collected += 1,
                }
                summary
            }))
    }

    async fn household_ids(&self) -> Result<Vec<HouseholdId>> {
        self.check_available()?;
        Ok(self.households.lock().await.iter().cloned().collect())
    }

    async fn ping(&self) -> Result<()> {
        self.check_available()
    }
}
