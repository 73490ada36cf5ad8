use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::household::HouseholdId;
use crate::error::CollectionError;

/// Default annotation written by the web scanner.
pub const WEB_SCANNER_COLLECTOR: &str = "WebApp Scanner";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionStatus {
    Pending,
    Collected,
}

impl CollectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Collected => "collected",
        }
    }
}

impl fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionStatus {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "collected" => Ok(Self::Collected),
            other => Err(CollectionError::Query(format!(
                "unknown collection status `{other}`"
            ))),
        }
    }
}

/// One household's log row for one collection day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionLog {
    pub household_id: HouseholdId,
    /// Last status change, UTC.
    pub collected_on: DateTime<Utc>,
    pub status: CollectionStatus,
    pub collector_name: Option<String>,
}

impl CollectionLog {
    pub fn pending(household_id: HouseholdId, now: DateTime<Utc>) -> Self {
        Self {
            household_id,
            collected_on: now,
            status: CollectionStatus::Pending,
            collector_name: None,
        }
    }
}

/// Row counts for a single collection day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub pending: u64,
    pub collected: u64,
}

impl DaySummary {
    pub fn total(&self) -> u64 {
        self.pending + self.collected
    }
}
