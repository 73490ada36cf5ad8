//! Calendar-day rules for collection logs.
//!
//! Timestamps are stored in UTC. Deciding which collection day a timestamp
//! belongs to always goes through [`DayBoundary`], which shifts the instant
//! by a fixed regional offset before taking the date. The server's local
//! clock and time zone never take part in the decision.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::{CollectionError, Result};

/// India Standard Time, UTC+05:30.
pub const IST_OFFSET_MINUTES: i32 = 330;

/// Widest real-world offsets (UTC-12:00 to UTC+14:00).
pub const MIN_OFFSET_MINUTES: i32 = -12 * 60;
pub const MAX_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset_minutes: i32,
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::ist()
    }
}

impl DayBoundary {
    pub const fn ist() -> Self {
        Self {
            offset_minutes: IST_OFFSET_MINUTES,
        }
    }

    pub fn new(offset_minutes: i32) -> Result<Self> {
        if !(MIN_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&offset_minutes)
        {
            return Err(CollectionError::InvalidRequest(format!(
                "UTC offset of {offset_minutes} minutes is outside {MIN_OFFSET_MINUTES}..={MAX_OFFSET_MINUTES}"
            )));
        }
        Ok(Self { offset_minutes })
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    /// The collection day an instant falls on.
    pub fn day_of(&self, instant: DateTime<Utc>) -> CollectionDay {
        let shifted = instant + Duration::minutes(i64::from(self.offset_minutes));
        CollectionDay {
            date: shifted.date_naive(),
            offset_minutes: self.offset_minutes,
        }
    }

    pub fn today(&self) -> CollectionDay {
        self.day_of(Utc::now())
    }
}

/// A calendar date together with the offset used to derive it. Repositories
/// receive both so storage-side comparisons apply the identical shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionDay {
    date: NaiveDate,
    offset_minutes: i32,
}

impl CollectionDay {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    /// Whether a stored UTC timestamp belongs to this day.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let shifted = instant + Duration::minutes(i64::from(self.offset_minutes));
        shifted.date_naive() == self.date
    }
}

impl std::fmt::Display for CollectionDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn late_utc_evening_rolls_into_next_regional_day() {
        let day = DayBoundary::ist().day_of(utc(2025, 3, 14, 23, 45));
        assert_eq!(day.date(), NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
    }

    #[test]
    fn regional_midnight_is_the_boundary() {
        let boundary = DayBoundary::ist();
        // 18:29 UTC is 23:59 IST, 18:30 UTC is 00:00 IST the next day.
        assert_eq!(
            boundary.day_of(utc(2025, 3, 14, 18, 29)).date(),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
        );
        assert_eq!(
            boundary.day_of(utc(2025, 3, 14, 18, 30)).date(),
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );
    }

    #[test]
    fn contains_uses_the_same_shift() {
        let day = DayBoundary::ist().day_of(utc(2025, 3, 15, 4, 0));
        assert!(day.contains(utc(2025, 3, 14, 23, 45)));
        assert!(!day.contains(utc(2025, 3, 14, 18, 0)));
        assert!(!day.contains(utc(2025, 3, 15, 18, 30)));
    }

    #[test]
    fn zero_offset_matches_utc_date() {
        let boundary = DayBoundary::new(0).unwrap();
        assert_eq!(
            boundary.day_of(utc(2025, 3, 14, 23, 45)).date(),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
        );
    }

    #[test]
    fn rejects_out_of_range_offsets() {
        assert!(DayBoundary::new(15 * 60).is_err());
        assert!(DayBoundary::new(-13 * 60).is_err());
        assert!(DayBoundary::new(MAX_OFFSET_MINUTES).is_ok());
    }

    #[test]
    fn displays_as_iso_date() {
        let day = DayBoundary::ist().day_of(utc(2025, 1, 5, 10, 0));
        assert_eq!(day.to_string(), "2025-01-05");
    }
}
