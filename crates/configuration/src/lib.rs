use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{ApiSettings, CacheSettings, Settings};

/// Loads the application configuration.
///
/// Sources, in order of increasing precedence: an optional `config.toml`
/// in the working directory, then environment variables prefixed with
/// `ATLAS_` (e.g. `ATLAS_API__BASE_URL`, double underscore separating
/// sections).
pub fn load_settings() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("ATLAS").separator("__"))
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    validate(&settings)?;

    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.api.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "api.base_url must not be empty".to_string(),
        ));
    }
    if settings.cache.ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache.ttl_secs must be greater than zero".to_string(),
        ));
    }
    if settings.cache.refresh_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache.refresh_interval_secs must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{ApiSettings, CacheSettings, Settings};

    fn settings(base_url: &str, ttl: u64) -> Settings {
        Settings {
            api: ApiSettings {
                base_url: base_url.to_string(),
                request_timeout_secs: 30,
            },
            cache: CacheSettings {
                ttl_secs: ttl,
                refresh_interval_secs: 30,
            },
        }
    }

    #[test]
    fn default_cache_settings_match_dashboard_expectations() {
        let cache = CacheSettings::default();
        assert_eq!(cache.ttl_secs, 300);
        assert_eq!(cache.refresh_interval_secs, 30);
    }

    #[test]
    fn validation_rejects_empty_base_url_and_zero_ttl() {
        assert!(validate(&settings("   ", 300)).is_err());
        assert!(validate(&settings("http://localhost:5000/api", 0)).is_err());
        assert!(validate(&settings("http://localhost:5000/api", 300)).is_ok());
    }
}
