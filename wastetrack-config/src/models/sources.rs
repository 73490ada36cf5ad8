use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::CONFIG_PATH_ENV;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub collection: FileCollectionConfig,
    #[serde(default)]
    pub seeding: FileSeedingConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_connections: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acquire_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_migrations: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCollectionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collector_name: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileSeedingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_startup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_fast: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub database_url: Option<String>,
    pub database_url_file: Option<PathBuf>,
    pub database_host: Option<String>,
    pub database_port: Option<u16>,
    pub database_user: Option<String>,
    pub database_name: Option<String>,
    pub database_password: Option<String>,
    pub database_password_file: Option<PathBuf>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
    pub run_migrations: Option<bool>,
    pub utc_offset_minutes: Option<i32>,
    pub collector_name: Option<String>,
    pub seed_on_startup: Option<bool>,
    pub seed_fail_fast: Option<bool>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub dev_mode: Option<bool>,
}

impl EnvConfig {
    /// Read the process environment.
    pub fn gather() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key).filter(|value| !value.trim().is_empty())
        };
        let parsed_u16 =
            |key: &str| var(key).and_then(|s| s.trim().parse::<u16>().ok());
        let parsed_i32 =
            |key: &str| var(key).and_then(|s| s.trim().parse::<i32>().ok());
        let parsed_u64 =
            |key: &str| var(key).and_then(|s| s.trim().parse::<u64>().ok());
        let parsed_u32 =
            |key: &str| var(key).and_then(|s| s.trim().parse::<u32>().ok());
        let flag = |key: &str| var(key).and_then(|s| parse_bool(&s));

        Self {
            config_path: var(CONFIG_PATH_ENV).map(PathBuf::from),
            server_host: var("SERVER_HOST"),
            // `PORT` is what most app platforms inject.
            server_port: parsed_u16("SERVER_PORT").or_else(|| parsed_u16("PORT")),
            database_url: var("DATABASE_URL"),
            database_url_file: var("DATABASE_URL_FILE").map(PathBuf::from),
            database_host: var("DB_SERVER").or_else(|| var("DB_HOST")),
            database_port: parsed_u16("DB_PORT"),
            database_user: var("DB_USER"),
            database_name: var("DB_DATABASE").or_else(|| var("DB_NAME")),
            database_password: var("DB_PASSWORD"),
            database_password_file: var("DB_PASSWORD_FILE").map(PathBuf::from),
            max_connections: parsed_u32("DB_MAX_CONNECTIONS"),
            min_connections: parsed_u32("DB_MIN_CONNECTIONS"),
            acquire_timeout_secs: parsed_u64("DB_ACQUIRE_TIMEOUT_SECS"),
            idle_timeout_secs: parsed_u64("DB_IDLE_TIMEOUT_SECS"),
            run_migrations: flag("DB_RUN_MIGRATIONS"),
            utc_offset_minutes: parsed_i32("COLLECTION_UTC_OFFSET_MINUTES"),
            collector_name: var("COLLECTOR_NAME"),
            seed_on_startup: flag("SEED_ON_STARTUP"),
            seed_fail_fast: flag("SEED_FAIL_FAST"),
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|raw| split_csv(&raw)),
            dev_mode: flag("DEV_MODE"),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
