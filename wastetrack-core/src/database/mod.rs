pub mod collection_logs;
pub mod ports;
pub mod postgres;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

pub use collection_logs::PostgresCollectionLogRepository;
pub use ports::CollectionLogRepository;
pub use postgres::{PoolSettings, PostgresDatabase};
