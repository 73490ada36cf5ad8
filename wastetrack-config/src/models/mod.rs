pub mod sources;

use std::{path::PathBuf, time::Duration};

use wastetrack_core::{
    database::PoolSettings,
    domain::{DayBoundary, IST_OFFSET_MINUTES, WEB_SCANNER_COLLECTOR},
};

use crate::{
    constants::{
        DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_IDLE_TIMEOUT_SECS,
        DEFAULT_MAX_CONNECTIONS, DEFAULT_MIN_CONNECTIONS,
        DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    },
    loader::db_url::DatabaseUrlOrigin,
};

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub collection: CollectionConfig,
    pub seeding: SeedingConfig,
    pub cors: CorsConfig,
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn day_boundary(&self) -> DayBoundary {
        self.collection.boundary
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub primary_url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            acquire_timeout: self.acquire_timeout,
            idle_timeout: self.idle_timeout,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            primary_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
            run_migrations: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollectionConfig {
    pub boundary: DayBoundary,
    /// Written to `collector_name` on every scan.
    pub collector_name: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            boundary: DayBoundary::ist(),
            collector_name: WEB_SCANNER_COLLECTOR.to_string(),
        }
    }
}

impl CollectionConfig {
    pub fn utc_offset_minutes(&self) -> i32 {
        self.boundary.offset_minutes()
    }

    pub fn uses_default_offset(&self) -> bool {
        self.boundary.offset_minutes() == IST_OFFSET_MINUTES
    }
}

/// Startup seeding policy.
#[derive(Debug, Clone)]
pub struct SeedingConfig {
    pub on_startup: bool,
    /// Abort startup when seeding fails instead of logging and serving.
    pub fail_fast: bool,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            on_startup: true,
            fail_fast: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl CorsConfig {
    pub fn is_wildcard_included(&self) -> bool {
        self.allowed_origins
            .iter()
            .any(|origin| origin.trim() == "*")
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
    pub database_url_origin: Option<DatabaseUrlOrigin>,
}
