//! # wastetrack-core
//!
//! Domain logic for the household waste collection tracker.
//!
//! - [`domain::DayBoundary`] decides which calendar day a UTC timestamp
//!   belongs to, using a fixed regional offset (IST by default).
//! - [`domain::CollectionService`] performs the idempotent "mark collected
//!   for today" transition.
//! - [`domain::DailySeeder`] inserts one `pending` log per household for the
//!   current day.
//! - [`database`] holds the repository port and its PostgreSQL adapter.
//!
//! ```no_run
//! use std::sync::Arc;
//! use wastetrack_core::{
//!     database::{PoolSettings, PostgresDatabase},
//!     domain::{CollectionService, DailySeeder, DayBoundary, HouseholdId},
//! };
//!
//! # async fn example() -> wastetrack_core::Result<()> {
//! let db = PostgresDatabase::connect("postgres://localhost/wastetrack", PoolSettings::default()).await?;
//! db.run_migrations().await?;
//! let logs = Arc::new(db.collection_logs());
//!
//! DailySeeder::new(logs.clone(), DayBoundary::ist()).seed().await?;
//!
//! let service = CollectionService::new(logs, DayBoundary::ist());
//! let outcome = service.mark_collected(&HouseholdId::parse("H001")?).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod domain;
pub mod error;

pub use error::{CollectionError, Result};

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
