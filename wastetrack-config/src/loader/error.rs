use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to load .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("config file {path} does not exist")]
    MissingConfig { path: PathBuf },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read secret file {path}: {source}")]
    SecretFileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid database URL: {source}")]
    InvalidDatabaseUrl {
        #[source]
        source: url::ParseError,
    },

    #[error("database URL must use the postgres:// or postgresql:// scheme, got `{scheme}`")]
    UnsupportedDatabaseScheme { scheme: String },

    #[error("database username `{username}` cannot be encoded in a URL")]
    InvalidDatabaseUsername { username: String },

    #[error("database password cannot be encoded in a URL")]
    InvalidDatabasePassword,

    #[error("invalid collection UTC offset: {0}")]
    InvalidUtcOffset(String),

    #[error(
        "database.min_connections ({min}) exceeds database.max_connections ({max})"
    )]
    InvalidPoolBounds { min: u32, max: u32 },
}
