pub mod db_url;
pub mod error;

use std::{fs, path::PathBuf, time::Duration};

use tracing::debug;
use wastetrack_core::domain::DayBoundary;

use crate::{
    constants::DEFAULT_CONFIG_LOCATIONS,
    models::{
        CollectionConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig,
        SeedingConfig, ServerConfig,
        sources::{EnvConfig, FileConfig},
    },
    validation::{ConfigWarnings, collect_warnings},
};
use db_url::DatabaseUrlSources;
pub use error::ConfigLoadError;

/// A composed configuration plus the non-fatal issues found while building it.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    pub skip_env_file: bool,
}

/// Builds [`Config`] from defaults, an optional TOML file and the
/// environment, in increasing order of precedence.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn without_env_file(mut self) -> Self {
        self.options.skip_env_file = true;
        self
    }

    /// Load `.env` (if present) and compose against the process environment.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.load_env_file()?;
        let mut load = self.load_with_env(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Compose against an explicit environment snapshot.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let config = compose_config(file_config.unwrap_or_default(), env, config_path)?;
        let warnings = collect_warnings(&config);
        Ok(ConfigLoad { config, warnings })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        if self.options.skip_env_file {
            return Ok(false);
        }
        let result = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path),
            None => dotenvy::dotenv().map(|_| ()),
        };
        match result {
            Ok(()) => Ok(true),
            Err(err) if err.not_found() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());

        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigLoadError::MissingConfig { path });
                }
                path
            }
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => return Ok((None, None)),
            },
        };

        debug!(path = %path.display(), "reading config file");
        let contents = fs::read_to_string(&path).map_err(|source| {
            ConfigLoadError::Io {
                path: path.clone(),
                source,
            }
        })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
                path: path.clone(),
                source,
            })?;

        Ok((Some(file_config), Some(path)))
    }
}

fn compose_config(
    file: FileConfig,
    env: EnvConfig,
    config_path: Option<PathBuf>,
) -> Result<Config, ConfigLoadError> {
    let resolved_url = DatabaseUrlSources::new(&env, &file.database).resolve()?;
    let database_url_origin = resolved_url.as_ref().map(|resolved| resolved.origin);
    let primary_url = resolved_url.map(|resolved| resolved.url);

    let server_defaults = ServerConfig::default();
    let server = ServerConfig {
        host: env
            .server_host
            .or(file.server.host)
            .unwrap_or(server_defaults.host),
        port: env
            .server_port
            .or(file.server.port)
            .unwrap_or(server_defaults.port),
    };

    let db_defaults = DatabaseConfig::default();
    let database = DatabaseConfig {
        primary_url,
        max_connections: env
            .max_connections
            .or(file.database.max_connections)
            .unwrap_or(db_defaults.max_connections),
        min_connections: env
            .min_connections
            .or(file.database.min_connections)
            .unwrap_or(db_defaults.min_connections),
        acquire_timeout: env
            .acquire_timeout_secs
            .or(file.database.acquire_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(db_defaults.acquire_timeout),
        idle_timeout: env
            .idle_timeout_secs
            .or(file.database.idle_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(db_defaults.idle_timeout),
        run_migrations: env
            .run_migrations
            .or(file.database.run_migrations)
            .unwrap_or(db_defaults.run_migrations),
    };

    if database.min_connections > database.max_connections {
        return Err(ConfigLoadError::InvalidPoolBounds {
            min: database.min_connections,
            max: database.max_connections,
        });
    }

    let collection_defaults = CollectionConfig::default();
    let boundary = match env
        .utc_offset_minutes
        .or(file.collection.utc_offset_minutes)
    {
        Some(offset) => DayBoundary::new(offset)
            .map_err(|err| ConfigLoadError::InvalidUtcOffset(err.to_string()))?,
        None => collection_defaults.boundary,
    };
    let collection = CollectionConfig {
        boundary,
        collector_name: env
            .collector_name
            .or(file.collection.collector_name)
            .unwrap_or(collection_defaults.collector_name),
    };

    let seeding_defaults = SeedingConfig::default();
    let seeding = SeedingConfig {
        on_startup: env
            .seed_on_startup
            .or(file.seeding.on_startup)
            .unwrap_or(seeding_defaults.on_startup),
        fail_fast: env
            .seed_fail_fast
            .or(file.seeding.fail_fast)
            .unwrap_or(seeding_defaults.fail_fast),
    };

    let cors = CorsConfig {
        allowed_origins: env
            .cors_allowed_origins
            .or(file.cors.allowed_origins)
            .unwrap_or_else(|| CorsConfig::default().allowed_origins),
    };

    Ok(Config {
        server,
        database,
        collection,
        seeding,
        cors,
        dev_mode: env.dev_mode.or(file.dev_mode).unwrap_or(false),
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded: false,
            database_url_origin,
        },
    })
}
