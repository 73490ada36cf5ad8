pub mod collection;
pub mod day;
pub mod household;
pub mod seeding;
pub mod status;

pub use collection::{CollectOutcome, CollectionService};
pub use day::{CollectionDay, DayBoundary, IST_OFFSET_MINUTES};
pub use household::HouseholdId;
pub use seeding::{DailySeeder, SeedReport};
pub use status::{CollectionLog, CollectionStatus, DaySummary, WEB_SCANNER_COLLECTOR};
