use std::{fmt, str::FromStr, time::Duration};

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::info;

use super::collection_logs::PostgresCollectionLogRepository;
use crate::error::{CollectionError, Result};

/// Connection pool tuning.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 0,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(30),
        }
    }
}

/// Long-lived PostgreSQL pool shared by every request handler.
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    settings: PoolSettings,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.settings.max_connections)
            .field("min_connections", &self.settings.min_connections)
            .finish()
    }
}

impl PostgresDatabase {
    pub async fn connect(
        connection_string: &str,
        settings: PoolSettings,
    ) -> Result<Self> {
        let connect_options = PgConnectOptions::from_str(connection_string)
            .map_err(|e| {
                CollectionError::StoreUnavailable(format!(
                    "Invalid PostgreSQL connection string: {e}"
                ))
            })?;

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.acquire_timeout)
            .idle_timeout(settings.idle_timeout)
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                CollectionError::from_sqlx("Database connection failed", e)
            })?;

        info!(
            max_connections = settings.max_connections,
            min_connections = settings.min_connections,
            "database pool initialized"
        );

        Ok(Self { pool, settings })
    }

    /// Wrap an existing pool (mainly for tests).
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            settings: PoolSettings::default(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn collection_logs(&self) -> PostgresCollectionLogRepository {
        PostgresCollectionLogRepository::new(self.pool.clone())
    }

    /// Apply pending schema migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        crate::MIGRATOR.run(&self.pool).await.map_err(|e| {
            CollectionError::Query(format!("Database migration failed: {e}"))
        })?;
        info!("database schema is up to date");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
