//! Application configuration.

use serde::Deserialize;

/// Environment variable holding the database connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Live streaming configuration.
    #[serde(default)]
    pub streaming: StreamingConfig,
    /// Admin action configuration.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Live streaming configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamingConfig {
    /// Base RTMP ingest URL; the stream key is appended as the last path segment.
    #[serde(default = "default_rtmp_base_url")]
    pub rtmp_base_url: String,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            rtmp_base_url: default_rtmp_base_url(),
        }
    }
}

/// Admin action configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    /// Shared secret expected in `X-Admin-Token`. Admin actions are open when unset.
    #[serde(default)]
    pub token: Option<String>,
}

impl AdminConfig {
    /// The configured token, treating an empty string as unset.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON formatted log lines.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    1
}

fn default_rtmp_base_url() -> String {
    "rtmp://stream.example.com/live".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `STREAMHUB_ENV`)
    /// 3. Environment variables with `STREAMHUB__` prefix
    /// 4. `DATABASE_URL`, which always wins for `database.url`
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("STREAMHUB_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("STREAMHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", std::env::var(DATABASE_URL_ENV).ok())?
            .build()?;

        config.try_deserialize()
    }

    /// Parse configuration from a TOML document, without consulting the environment.
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Build a configuration that only knows its database URL.
    #[must_use]
    pub fn with_database_url(url: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: url.into(),
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
            },
            streaming: StreamingConfig::default(),
            admin: AdminConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
