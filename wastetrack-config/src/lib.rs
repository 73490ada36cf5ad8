//! Configuration library for the waste collection tracker.
//!
//! Settings are composed from built-in defaults, an optional TOML file
//! (`WASTETRACK_CONFIG`, `wastetrack.toml` or `config/wastetrack.toml`) and
//! the process environment (optionally seeded from `.env`). Database
//! credentials never have defaults; they must come from the environment, a
//! secret file or the config file.

pub mod constants;
pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{
    ConfigLoad, ConfigLoader, ConfigLoaderOptions,
    db_url::{self, DatabaseUrlOrigin, DatabaseUrlSources, ResolvedDatabaseUrl},
    error::ConfigLoadError,
};
pub use models::{
    CollectionConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig,
    SeedingConfig, ServerConfig,
};
pub use validation::{ConfigWarning, ConfigWarnings};
