//! Runtime configuration: store mode and backend location.
//!
//! Each value resolves from the first source that has it: command-line
//! flag, environment variable, settings database, built-in default.

use std::env;
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::db::Database;
use crate::error::ConfigError;

pub const SETTING_MODE: &str = "mode";
pub const SETTING_API_URL: &str = "api_url";
pub const SETTING_API_PREFIX: &str = "api_prefix";

/// Keys accepted by `config set` / `config unset`.
pub const SETTING_KEYS: &[&str] = &[SETTING_MODE, SETTING_API_URL, SETTING_API_PREFIX];

pub const ENV_MODE: &str = "LEADMGR_MODE";
pub const ENV_API_URL: &str = "LEADMGR_API_URL";
pub const ENV_API_PREFIX: &str = "LEADMGR_API_PREFIX";

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Which store implementation backs the user entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreMode {
    /// Everything in memory, seeded with sample data
    #[default]
    Mock,
    /// Users go through the REST backend
    Live,
}

impl StoreMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Live => "live",
        }
    }
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "live" => Ok(Self::Live),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub mode: StoreMode,
    /// Scheme, host and port of the backend, without the API prefix or a trailing slash
    pub api_url: String,
    /// Path prefix for the REST routes; may be empty
    pub api_prefix: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: StoreMode::Mock,
            api_url: DEFAULT_API_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and database settings.
    /// Environment variables take precedence over database settings.
    pub fn load(db: &Database) -> Result<Self, ConfigError> {
        Self::resolve(db, |key| env::var(key).ok())
    }

    /// Same as `load`, with the environment supplied by `lookup`.
    pub fn resolve(
        db: &Database,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let pick = |env_key: &str, setting: &str| -> Result<Option<String>, ConfigError> {
            match lookup(env_key).filter(|v| !v.trim().is_empty()) {
                Some(v) => Ok(Some(v)),
                None => Ok(db.get_setting(setting)?),
            }
        };

        let mut config = Self::default();
        if let Some(mode) = pick(ENV_MODE, SETTING_MODE)? {
            config.mode = mode.parse()?;
        }
        if let Some(url) = pick(ENV_API_URL, SETTING_API_URL)? {
            config.api_url = parse_api_url(&url)?;
        }
        if let Some(prefix) = pick(ENV_API_PREFIX, SETTING_API_PREFIX)? {
            config.api_prefix = normalize_prefix(&prefix);
        }
        Ok(config)
    }

    /// Apply command-line overrides on top of the resolved values.
    pub fn with_overrides(
        mut self,
        mode: Option<StoreMode>,
        api_url: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(mode) = mode {
            self.mode = mode;
        }
        if let Some(url) = api_url {
            self.api_url = parse_api_url(url)?;
        }
        Ok(self)
    }

    /// Root for REST routes, e.g. `http://localhost:5000/api`.
    pub fn api_base(&self) -> String {
        format!("{}{}", self.api_url, self.api_prefix)
    }

    /// Validate and persist one setting.
    pub fn set(db: &Database, key: &str, value: &str) -> Result<(), ConfigError> {
        let stored = match key {
            SETTING_MODE => value.parse::<StoreMode>()?.as_str().to_string(),
            SETTING_API_URL => parse_api_url(value)?,
            SETTING_API_PREFIX => normalize_prefix(value),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        db.set_setting(key, &stored)?;
        Ok(())
    }

    /// Remove one stored setting. Returns false if it was not set.
    pub fn unset(db: &Database, key: &str) -> Result<bool, ConfigError> {
        if !SETTING_KEYS.contains(&key) {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }
        Ok(db.delete_setting(key)?)
    }
}

/// Validate an http(s) URL and return it without a trailing slash.
pub fn parse_api_url(value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl {
        value: value.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url.as_str().trim_end_matches('/').to_string()),
        _ => Err(ConfigError::UnsupportedScheme(value.to_string())),
    }
}

/// `api`, `/api/` and `/api` all become `/api`; blank becomes empty.
pub fn normalize_prefix(value: &str) -> String {
    let trimmed = value.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let db = Database::open_memory().unwrap();
        let config = AppConfig::resolve(&db, no_env).unwrap();
        assert_eq!(config.mode, StoreMode::Mock);
        assert_eq!(config.api_base(), "http://localhost:5000/api");
    }

    #[test]
    fn test_env_beats_database() {
        let db = Database::open_memory().unwrap();
        AppConfig::set(&db, SETTING_MODE, "mock").unwrap();
        AppConfig::set(&db, SETTING_API_URL, "http://db-host:9000").unwrap();

        let env: HashMap<&str, &str> = [(ENV_MODE, "LIVE"), (ENV_API_PREFIX, "")].into();
        let config = AppConfig::resolve(&db, |k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.mode, StoreMode::Live);
        // blank env value falls through to the next source
        assert_eq!(config.api_base(), "http://db-host:9000/api");
    }

    #[test]
    fn test_flags_beat_everything() {
        let db = Database::open_memory().unwrap();
        AppConfig::set(&db, SETTING_MODE, "live").unwrap();
        let config = AppConfig::resolve(&db, no_env)
            .unwrap()
            .with_overrides(Some(StoreMode::Mock), Some("https://crm.example.com/"))
            .unwrap();
        assert_eq!(config.mode, StoreMode::Mock);
        assert_eq!(config.api_base(), "https://crm.example.com/api");
    }

    #[test]
    fn test_prefix_is_configurable() {
        let db = Database::open_memory().unwrap();
        AppConfig::set(&db, SETTING_API_PREFIX, "v2/").unwrap();
        assert_eq!(db.get_setting(SETTING_API_PREFIX).unwrap().as_deref(), Some("/v2"));
        let config = AppConfig::resolve(&db, no_env).unwrap();
        assert_eq!(config.api_base(), "http://localhost:5000/v2");

        AppConfig::set(&db, SETTING_API_PREFIX, "/").unwrap();
        let config = AppConfig::resolve(&db, no_env).unwrap();
        assert_eq!(config.api_base(), "http://localhost:5000");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let db = Database::open_memory().unwrap();
        assert!(matches!(
            AppConfig::set(&db, SETTING_MODE, "staging"),
            Err(ConfigError::InvalidMode(_))
        ));
        assert!(matches!(
            AppConfig::set(&db, SETTING_API_URL, "not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            AppConfig::set(&db, SETTING_API_URL, "ftp://files.example.com"),
            Err(ConfigError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            AppConfig::set(&db, "colour", "blue"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(db.list_settings().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_stored_mode_is_reported() {
        let db = Database::open_memory().unwrap();
        db.set_setting(SETTING_MODE, "sometimes").unwrap();
        let err = AppConfig::resolve(&db, no_env).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid mode 'sometimes' (expected 'mock' or 'live')"
        );
    }

    #[test]
    fn test_unset() {
        let db = Database::open_memory().unwrap();
        AppConfig::set(&db, SETTING_MODE, "live").unwrap();
        assert!(AppConfig::unset(&db, SETTING_MODE).unwrap());
        assert!(!AppConfig::unset(&db, SETTING_MODE).unwrap());
        assert!(matches!(
            AppConfig::unset(&db, "colour"),
            Err(ConfigError::UnknownKey(_))
        ));
    }
}
