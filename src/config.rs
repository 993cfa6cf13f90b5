//! Configuration types and loading.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default port for the HTTP API.
pub const DEFAULT_PORT: u16 = 5001;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

/// Server-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Address the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on (default: 5001).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed to call the API from a browser.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("myapp.db")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Config {
    /// Load configuration from file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from default locations or return defaults.
    pub fn load_or_default() -> Self {
        // Try TODO_API_CONFIG_PATH environment variable first
        if let Ok(config_path) = std::env::var("TODO_API_CONFIG_PATH")
            && let Ok(config) = Self::load(&config_path)
        {
            return config;
        }

        // Try todo-api.yaml in the working directory
        if let Ok(config) = Self::load("todo-api.yaml") {
            return config;
        }

        // Fall back to defaults with environment variable overrides
        let mut config = Self::default();

        if let Ok(db_path) = std::env::var("TODO_API_DB_PATH") {
            config.server.db_path = PathBuf::from(db_path);
        }

        if let Ok(port) = std::env::var("TODO_API_PORT")
            && let Ok(port) = port.parse()
        {
            config.server.port = port;
        }

        config
    }

    /// Ensure the database directory exists.
    pub fn ensure_db_dir(&self) -> Result<()> {
        // A bare file name like the default `myapp.db` has an empty parent.
        if let Some(parent) = self.server.db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
