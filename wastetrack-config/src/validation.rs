use crate::models::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push(&mut self, message: impl Into<String>, hint: Option<&str>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: hint.map(str::to_string),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Non-fatal checks on a fully composed configuration.
pub fn collect_warnings(config: &Config) -> ConfigWarnings {
    let mut warnings = ConfigWarnings::default();

    if config.cors.is_wildcard_included() && !config.dev_mode {
        warnings.push(
            "CORS allows any origin outside dev mode",
            Some("set CORS_ALLOWED_ORIGINS to the scanner's origin"),
        );
    }

    if !config.seeding.on_startup {
        warnings.push(
            "startup seeding is disabled; scans will report 'processed' until `seed` runs",
            Some("schedule `wastetrack-server seed` or set SEED_ON_STARTUP=true"),
        );
    }

    if !config.collection.uses_default_offset() {
        warnings.push(
            format!(
                "collection day uses UTC offset {} minutes instead of IST",
                config.collection.utc_offset_minutes()
            ),
            None,
        );
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use wastetrack_core::domain::DayBoundary;

    #[test]
    fn default_config_warns_only_about_cors() {
        let warnings = collect_warnings(&Config::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings.items[0].message.contains("CORS"));
    }

    #[test]
    fn dev_mode_silences_cors_warning() {
        let config = Config {
            dev_mode: true,
            ..Config::default()
        };
        assert!(collect_warnings(&config).is_empty());
    }

    #[test]
    fn disabled_seeding_and_custom_offset_are_reported() {
        let mut config = Config {
            dev_mode: true,
            ..Config::default()
        };
        config.seeding.on_startup = false;
        config.collection.boundary = DayBoundary::new(60).unwrap();

        let warnings = collect_warnings(&config);
        assert_eq!(warnings.len(), 2);
    }
}
