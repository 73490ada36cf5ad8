//! Where the PostgreSQL connection URL comes from.
//!
//! [`DatabaseUrlSources`] walks [`DatabaseUrlOrigin::PRECEDENCE`] and takes
//! the first origin that yields a URL. Origins that describe a complete
//! connection string are used as given; the config-file URL and the
//! `DB_SERVER` / `DB_DATABASE` parts receive a password from
//! `DB_PASSWORD` or a secret file when they carry none.

use std::{fmt, fs, path::Path};

use url::Url;

use crate::{
    ConfigLoadError,
    constants::DEFAULT_DATABASE_PORT,
    models::sources::{EnvConfig, FileDatabaseConfig},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseUrlOrigin {
    /// `DATABASE_URL`
    EnvUrl,
    /// `DATABASE_URL_FILE`
    UrlFile,
    /// `database.url` in the TOML file
    ConfigFile,
    /// `DB_SERVER`, `DB_PORT`, `DB_USER` and `DB_DATABASE`
    Parts,
}

impl DatabaseUrlOrigin {
    pub const PRECEDENCE: [Self; 4] =
        [Self::EnvUrl, Self::UrlFile, Self::ConfigFile, Self::Parts];

    fn takes_injected_password(self) -> bool {
        matches!(self, Self::ConfigFile | Self::Parts)
    }
}

impl fmt::Display for DatabaseUrlOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EnvUrl => "DATABASE_URL",
            Self::UrlFile => "DATABASE_URL_FILE",
            Self::ConfigFile => "config file database.url",
            Self::Parts => "DB_* variables",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDatabaseUrl {
    pub url: String,
    pub origin: DatabaseUrlOrigin,
}

#[derive(Debug, Clone, Copy)]
pub struct DatabaseUrlSources<'a> {
    env: &'a EnvConfig,
    file: &'a FileDatabaseConfig,
}

impl<'a> DatabaseUrlSources<'a> {
    pub fn new(env: &'a EnvConfig, file: &'a FileDatabaseConfig) -> Self {
        Self { env, file }
    }

    /// `Ok(None)` when no origin is configured.
    pub fn resolve(
        &self,
    ) -> Result<Option<ResolvedDatabaseUrl>, ConfigLoadError> {
        for origin in DatabaseUrlOrigin::PRECEDENCE {
            let Some(mut url) = self.candidate(origin)? else {
                continue;
            };

            if origin.takes_injected_password()
                && url.password().is_none()
                && let Some(password) = self.password()?
            {
                url.set_password(Some(&password))
                    .map_err(|_| ConfigLoadError::InvalidDatabasePassword)?;
            }

            let url = require_postgres(url)?;
            return Ok(Some(ResolvedDatabaseUrl { url, origin }));
        }
        Ok(None)
    }

    fn candidate(
        &self,
        origin: DatabaseUrlOrigin,
    ) -> Result<Option<Url>, ConfigLoadError> {
        let raw = match origin {
            DatabaseUrlOrigin::EnvUrl => self.env.database_url.clone(),
            DatabaseUrlOrigin::UrlFile => match &self.env.database_url_file {
                Some(path) => read_secret(path)?,
                None => None,
            },
            DatabaseUrlOrigin::ConfigFile => self.file.url.clone(),
            DatabaseUrlOrigin::Parts => return self.from_parts(),
        };

        raw.map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .map(|value| Url::parse(&value).map_err(invalid_url))
            .transpose()
    }

    // Needs server, user and database; the port falls back to 5432.
    fn from_parts(&self) -> Result<Option<Url>, ConfigLoadError> {
        let (Some(server), Some(user), Some(database)) = (
            self.env.database_host.as_deref(),
            self.env.database_user.as_deref(),
            self.env.database_name.as_deref(),
        ) else {
            return Ok(None);
        };

        let mut url = Url::parse("postgres://localhost").map_err(invalid_url)?;
        url.set_host(Some(server.trim())).map_err(invalid_url)?;
        url.set_port(Some(self.env.database_port.unwrap_or(DEFAULT_DATABASE_PORT)))
            .map_err(|_| invalid_url(url::ParseError::InvalidPort))?;
        url.set_username(user.trim()).map_err(|_| {
            ConfigLoadError::InvalidDatabaseUsername {
                username: user.to_owned(),
            }
        })?;
        url.set_path(&format!("/{}", database.trim()));
        Ok(Some(url))
    }

    /// `DB_PASSWORD`, then `DB_PASSWORD_FILE`, then `database.password_file`.
    pub fn password(&self) -> Result<Option<String>, ConfigLoadError> {
        if let Some(password) = &self.env.database_password {
            return Ok(Some(password.clone()));
        }

        [
            self.env.database_password_file.as_deref(),
            self.file.password_file.as_deref(),
        ]
        .into_iter()
        .flatten()
        .try_fold(None, |found, path| match found {
            Some(_) => Ok(found),
            None => read_secret(path),
        })
    }
}

fn invalid_url(source: url::ParseError) -> ConfigLoadError {
    ConfigLoadError::InvalidDatabaseUrl { source }
}

fn require_postgres(url: Url) -> Result<String, ConfigLoadError> {
    match url.scheme() {
        "postgres" | "postgresql" => Ok(url.into()),
        other => Err(ConfigLoadError::UnsupportedDatabaseScheme {
            scheme: other.to_owned(),
        }),
    }
}

// Blank secret files count as unset.
fn read_secret(path: &Path) -> Result<Option<String>, ConfigLoadError> {
    let contents = fs::read_to_string(path).map_err(|source| {
        ConfigLoadError::SecretFileIo {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(Some(contents.trim().to_owned()).filter(|secret| !secret.is_empty()))
}

/// Render a URL for logs with the password masked.
pub fn redact_database_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("****"));
            }
            url.to_string()
        }
        Err(_) => "<unparseable database url>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn resolve(
        env: &EnvConfig,
        file: &FileDatabaseConfig,
    ) -> Option<ResolvedDatabaseUrl> {
        DatabaseUrlSources::new(env, file).resolve().unwrap()
    }

    fn secret_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{contents}").unwrap();
        file
    }

    fn parts() -> EnvConfig {
        EnvConfig {
            database_host: Some("db.internal".into()),
            database_user: Some("collector".into()),
            database_name: Some("waste".into()),
            ..EnvConfig::default()
        }
    }

    #[test]
    fn explicit_url_wins_over_everything() {
        let env = EnvConfig {
            database_url: Some("postgres://u:p@h/db".into()),
            ..parts()
        };
        let file = FileDatabaseConfig {
            url: Some("postgres://other/db".into()),
            ..FileDatabaseConfig::default()
        };

        let resolved = resolve(&env, &file).unwrap();
        assert_eq!(resolved.url, "postgres://u:p@h/db");
        assert_eq!(resolved.origin, DatabaseUrlOrigin::EnvUrl);
    }

    #[test]
    fn url_file_beats_config_file() {
        let secret = secret_file("postgres://svc:pw@vault-db/waste");
        let env = EnvConfig {
            database_url_file: Some(secret.path().to_path_buf()),
            ..EnvConfig::default()
        };
        let file = FileDatabaseConfig {
            url: Some("postgres://other/db".into()),
            ..FileDatabaseConfig::default()
        };

        let resolved = resolve(&env, &file).unwrap();
        assert_eq!(resolved.origin, DatabaseUrlOrigin::UrlFile);
        assert_eq!(resolved.url, "postgres://svc:pw@vault-db/waste");
    }

    #[test]
    fn assembles_url_from_parts_with_encoded_password() {
        let env = EnvConfig {
            database_password: Some("p@ss word".into()),
            ..parts()
        };

        let resolved = resolve(&env, &FileDatabaseConfig::default()).unwrap();
        assert_eq!(resolved.origin, DatabaseUrlOrigin::Parts);

        let parsed = Url::parse(&resolved.url).unwrap();
        assert_eq!(parsed.host_str(), Some("db.internal"));
        assert_eq!(parsed.port(), Some(5432));
        assert_eq!(parsed.username(), "collector");
        assert_eq!(parsed.path(), "/waste");
        assert_eq!(parsed.password(), Some("p%40ss%20word"));
    }

    #[test]
    fn config_file_url_receives_password_from_secret_file() {
        let secret = secret_file("from-file");
        let env = EnvConfig {
            database_password_file: Some(secret.path().to_path_buf()),
            ..EnvConfig::default()
        };
        let file = FileDatabaseConfig {
            url: Some("postgresql://app@localhost:5432/waste".into()),
            ..FileDatabaseConfig::default()
        };

        let resolved = resolve(&env, &file).unwrap();
        assert_eq!(resolved.origin, DatabaseUrlOrigin::ConfigFile);
        assert_eq!(
            Url::parse(&resolved.url).unwrap().password(),
            Some("from-file")
        );
    }

    #[test]
    fn explicit_url_is_not_given_an_injected_password() {
        let env = EnvConfig {
            database_url: Some("postgres://app@h/db".into()),
            database_password: Some("unused".into()),
            ..EnvConfig::default()
        };

        let resolved = resolve(&env, &FileDatabaseConfig::default()).unwrap();
        assert_eq!(Url::parse(&resolved.url).unwrap().password(), None);
    }

    #[test]
    fn blank_password_file_falls_through_to_the_next_one() {
        let blank = secret_file("   ");
        let real = secret_file("second");
        let env = EnvConfig {
            database_password_file: Some(blank.path().to_path_buf()),
            ..EnvConfig::default()
        };
        let file = FileDatabaseConfig {
            password_file: Some(real.path().to_path_buf()),
            ..FileDatabaseConfig::default()
        };

        let password = DatabaseUrlSources::new(&env, &file).password().unwrap();
        assert_eq!(password.as_deref(), Some("second"));
    }

    #[test]
    fn rejects_non_postgres_scheme() {
        let env = EnvConfig {
            database_url: Some("mysql://u:p@h/db".into()),
            ..EnvConfig::default()
        };
        let err = DatabaseUrlSources::new(&env, &FileDatabaseConfig::default())
            .resolve()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::UnsupportedDatabaseScheme { ref scheme } if scheme == "mysql"
        ));
    }

    #[test]
    fn incomplete_parts_resolve_to_none() {
        let env = EnvConfig {
            database_host: Some("db".into()),
            ..EnvConfig::default()
        };
        assert!(resolve(&env, &FileDatabaseConfig::default()).is_none());
    }

    #[test]
    fn redaction_masks_password() {
        assert_eq!(
            redact_database_url("postgres://app:secret@db:5432/waste"),
            "postgres://app:****@db:5432/waste"
        );
    }
}
