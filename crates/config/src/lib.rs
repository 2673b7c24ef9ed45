use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

pub use config::Environment as ConfigEnvironment;

/// `AppConfig` holds all configuration parameters required by the application.
///
/// The configuration is loaded from environment variables (optionally via a `.env` file)
/// or uses default values if the variable is not set. Fields cover the database,
/// the OTP cache, the HTTP server, pagination bounds and logging.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    // --- Database settings ---
    /// Database hostname or service name (e.g. "postgres" in Docker Compose, "localhost" for local runs).
    pub db_host: String,
    /// Database port (default: 5432).
    pub db_port: u16,
    /// Database user.
    pub db_user: String,
    /// Database password.
    pub db_password: String,
    /// Database name.
    pub db_name: String,
    /// Upper bound of the connection pool.
    pub db_max_connections: usize,
    /// Directory with `.sql` migrations applied at start-up.
    pub migrations_dir: String,

    // --- OTP cache ---
    /// Redis connection URL. An empty value selects the in-process store.
    pub redis_url: String,
    /// Prefix prepended to every OTP key.
    pub redis_key_prefix: String,
    /// Lifetime of an issued OTP code (human-friendly format, e.g. "2m").
    #[serde(deserialize_with = "deserialize_duration")]
    pub otp_ttl: Duration,

    // --- HTTP server ---
    /// The port on which the HTTP server will listen.
    pub http_port: u16,
    /// Graceful shutdown timeout (human-friendly format, e.g. "5s", "1m").
    #[serde(deserialize_with = "deserialize_duration")]
    pub shutdown_timeout: Duration,

    // --- Pagination ---
    /// `limit` used when a listing request omits it.
    pub default_page_limit: u64,
    /// Largest `limit` a client may ask for.
    pub max_page_limit: u64,

    // --- Logging ---
    /// Default `tracing` filter when `RUST_LOG` is not set.
    pub log_level: String,
}

/// Custom deserializer for durations.
/// Accepts human-readable formats like "5s", "2m", etc.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let val = String::deserialize(deserializer)?;
    humantime::parse_duration(&val)
        .map_err(|e| D::Error::custom(format!("Invalid duration '{val}': {e}")))
}

impl AppConfig {
    /// Loads configuration from environment variables (and optionally from `.env` file).
    ///
    /// Fields not set via env will be filled with default values.
    ///
    /// # Errors
    /// Returns an error if environment variables are invalid or missing required values.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env(ConfigEnvironment::default())
    }

    /// Builds the configuration from the defaults overlaid with `env`.
    ///
    /// Split out of [`AppConfig::load`] so tests can feed a synthetic environment.
    pub fn from_env(env: ConfigEnvironment) -> Result<Self> {
        let settings = config::Config::builder()
            // Database
            .set_default("db_host", "localhost")?
            .set_default("db_port", 5432)?
            .set_default("db_user", "food")?
            .set_default("db_password", "securepassword")?
            .set_default("db_name", "food_delivery")?
            .set_default("db_max_connections", 16)?
            .set_default("migrations_dir", "migrations")?
            // OTP cache
            .set_default("redis_url", "redis://localhost:6379")?
            .set_default("redis_key_prefix", "otp:")?
            .set_default("otp_ttl", "2m")?
            // HTTP
            .set_default("http_port", 9090)?
            .set_default("shutdown_timeout", "5s")?
            // Pagination
            .set_default("default_page_limit", 10)?
            .set_default("max_page_limit", 1000)?
            // Logging
            .set_default("log_level", "info")?
            .add_source(env)
            .build()?;

        let cfg: AppConfig = settings
            .try_deserialize()
            .context("Failed to load configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// libpq-style connection string for the configured database.
    pub fn database_dsn(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={} sslmode=disable",
            self.db_host, self.db_port, self.db_user, self.db_password, self.db_name
        )
    }

    fn validate(&self) -> Result<()> {
        if self.default_page_limit == 0 || self.default_page_limit > self.max_page_limit {
            anyhow::bail!(
                "default_page_limit must be in 1..={} (got {})",
                self.max_page_limit,
                self.default_page_limit
            );
        }
        if self.db_max_connections == 0 {
            anyhow::bail!("db_max_connections must be positive");
        }
        Ok(())
    }
}
