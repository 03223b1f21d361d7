//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub queries: QueriesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `sqlite://<path>`, a bare path, or `:memory:`
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Apply the baseline dataset on startup when the database is empty
    #[serde(default = "default_seed")]
    pub seed: bool,
}

fn default_database_url() -> String {
    "sqlite://campus_hours.db".to_string()
}

fn default_pool_size() -> usize {
    4
}

fn default_seed() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            pool_size: default_pool_size(),
            seed: default_seed(),
        }
    }
}

/// Query Store location
#[derive(Debug, Clone, Deserialize)]
pub struct QueriesConfig {
    #[serde(default = "default_queries_path")]
    pub path: PathBuf,
}

fn default_queries_path() -> PathBuf {
    PathBuf::from("queries/queries.sql")
}

impl Default for QueriesConfig {
    fn default() -> Self {
        Self {
            path: default_queries_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse TOML content
    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            Some(PathBuf::from("./config.toml")),
            dirs::config_dir().map(|p| p.join("campus-hours").join("config.toml")),
            Some(PathBuf::from("/etc/campus-hours/config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(host) = var("CAMPUS_HOURS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("CAMPUS_HOURS_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Database overrides
        if let Some(url) = var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(size) = var("CAMPUS_HOURS_POOL_SIZE") {
            if let Ok(s) = size.parse() {
                self.database.pool_size = s;
            }
        }

        // Query Store override
        if let Some(path) = var("CAMPUS_HOURS_QUERIES") {
            self.queries.path = PathBuf::from(path);
        }

        // Logging overrides
        if let Some(level) = var("CAMPUS_HOURS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("CAMPUS_HOURS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Campus Hours Configuration
#
# Environment variables override these settings:
# - CAMPUS_HOURS_HOST
# - CAMPUS_HOURS_PORT
# - DATABASE_URL
# - CAMPUS_HOURS_POOL_SIZE
# - CAMPUS_HOURS_QUERIES
# - CAMPUS_HOURS_LOG_LEVEL
# - CAMPUS_HOURS_LOG_FORMAT

[server]
# HTTP server host
host = "0.0.0.0"

# HTTP server port
port = 8080

[database]
# SQLite database: sqlite://<path>, a bare path, or :memory:
url = "sqlite://campus_hours.db"

# Number of pooled connections
pool_size = 4

# Insert the baseline dataset when the database is empty
seed = true

[queries]
# SQL statements separated by "-- QUERY BREAK --".
# Order matters: professor hours first, room schedules second.
path = "queries/queries.sql"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
