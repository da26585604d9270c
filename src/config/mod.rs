//! Startup configuration for the MuchToDo service.
//!
//! Values are resolved from built-in defaults, an optional `.env` file in a
//! given directory, and the process environment, in that order of precedence
//! (the environment wins). The loader is a local builder with no global
//! registry, so tests can load with an explicit environment snapshot.

mod error;
mod keys;
mod source;

pub use error::ConfigError;
pub use keys::{Key, Kind};
pub use source::{Provenance, Source};

use source::Settings;
use std::{env, path::Path, time::Duration};

/// Name of the env-style file looked up in the config directory.
pub const ENV_FILE_NAME: &str = ".env";

/// Fully resolved, read-only service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    server_port: String,
    mongo_uri: String,
    db_name: String,
    jwt_secret_key: String,
    jwt_expiration_hours: i64,
    enable_cache: bool,
    redis_addr: String,
    redis_password: String,
    log_level: String,
    log_format: String,
    sources: Provenance,
}

impl Config {
    /// Load configuration from `<dir>/.env` and the process environment.
    ///
    /// A missing file or directory is not an error. Environment entries that
    /// are not valid UTF-8 are ignored.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let vars = env::vars_os().filter_map(|(name, value)| {
            Some((name.into_string().ok()?, value.into_string().ok()?))
        });
        Self::load_with_env(dir, vars)
    }

    /// Load configuration using `vars` in place of the process environment
    /// for the environment layer.
    ///
    /// `${VAR}` substitution inside `.env` values still resolves against the
    /// process environment (then earlier entries of the file), not `vars`.
    pub fn load_with_env<I, K, V>(dir: impl AsRef<Path>, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut settings = Settings::with_defaults();
        settings.merge_env_file(&dir.as_ref().join(ENV_FILE_NAME))?;
        settings.merge_env(vars);
        Self::from_settings(&settings)
    }

    fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self {
            server_port: settings.text(Key::Port),
            mongo_uri: settings.text(Key::MongoUri),
            db_name: settings.text(Key::DbName),
            jwt_secret_key: settings.text(Key::JwtSecretKey),
            jwt_expiration_hours: settings.integer(Key::JwtExpirationHours)?,
            enable_cache: settings.boolean(Key::EnableCache)?,
            redis_addr: settings.text(Key::RedisAddr),
            redis_password: settings.text(Key::RedisPassword),
            log_level: settings.text(Key::LogLevel),
            log_format: settings.text(Key::LogFormat),
            sources: settings.provenance(),
        })
    }

    /// Listening port for the HTTP server.
    pub fn server_port(&self) -> &str {
        &self.server_port
    }

    /// MongoDB connection string.
    pub fn mongo_uri(&self) -> &str {
        &self.mongo_uri
    }

    /// Logical database name within the store.
    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    /// Signing key for auth tokens; empty when unconfigured.
    pub fn jwt_secret_key(&self) -> &str {
        &self.jwt_secret_key
    }

    /// Token lifetime in hours, as configured.
    pub fn jwt_expiration_hours(&self) -> i64 {
        self.jwt_expiration_hours
    }

    /// Token lifetime. Negative hour counts clamp to zero.
    pub fn jwt_expiration(&self) -> Duration {
        let hours = u64::try_from(self.jwt_expiration_hours).unwrap_or(0);
        Duration::from_secs(hours.saturating_mul(3600))
    }

    /// Whether the Redis caching layer is active.
    pub fn enable_cache(&self) -> bool {
        self.enable_cache
    }

    /// Redis server address; empty when unconfigured.
    pub fn redis_addr(&self) -> &str {
        &self.redis_addr
    }

    /// Redis credential; empty when unconfigured.
    pub fn redis_password(&self) -> &str {
        &self.redis_password
    }

    /// Minimum severity to log, e.g. "INFO".
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Log line encoding: "json" or plain text.
    pub fn log_format(&self) -> &str {
        &self.log_format
    }

    /// Which layer supplied each key.
    pub fn sources(&self) -> &Provenance {
        &self.sources
    }
}
