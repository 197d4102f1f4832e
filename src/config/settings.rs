//! Configuration settings for the academic calendar service.

use crate::error::{ConfigError, Result};
use crate::storage::is_valid_identifier;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `mcp.api_base_url`.
pub const API_BASE_URL_ENV: &str = "CALENDAR_API_BASE_URL";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub mcp: McpConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("config.toml"),
            PathBuf::from("academic-calendar.toml"),
            dirs::config_dir()
                .map(|p| p.join("academic-calendar/config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".academic-calendar/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Apply environment overrides on top of file values.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.mcp.api_base_url = url;
            }
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.storage.backend == StorageBackendType::Sqlite
            && self.storage.database_path.is_empty()
        {
            return Err(ConfigError::MissingField("storage.database_path".to_string()).into());
        }

        if !is_valid_identifier(&self.storage.table_name) {
            return Err(ConfigError::Invalid(format!(
                "storage.table_name '{}' is not a valid identifier",
                self.storage.table_name
            ))
            .into());
        }

        if self.mcp.api_base_url.is_empty() {
            return Err(ConfigError::MissingField("mcp.api_base_url".to_string()).into());
        }

        if self.mcp.timeout_secs == 0 {
            return Err(ConfigError::Invalid("mcp.timeout_secs must be > 0".to_string()).into());
        }

        Ok(())
    }

    /// Expand the database path.
    pub fn database_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.storage.database_path);
        PathBuf::from(expanded.as_ref())
    }
}

/// REST server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Allowed CORS origins ("*" for any)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// Storage backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendType {
    /// SQLite database file
    Sqlite,
    /// In-process table, lost on exit
    Memory,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
    /// SQLite database file
    pub database_path: String,
    /// Events table name
    pub table_name: String,
    /// Maximum pooled connections
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::Sqlite,
            database_path: "CalendarDB.db".to_string(),
            table_name: "calendar".to_string(),
            max_connections: 5,
        }
    }
}

/// Transport type enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    Stdio,
    Http,
}

/// MCP adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct McpConfig {
    /// Base URL of the schedule REST API
    pub api_base_url: String,
    /// Transport type: "stdio" or "http"
    pub transport: TransportType,
    /// HTTP port (only used when transport is "http")
    pub http_port: u16,
    /// Display name used in tool output headers
    pub calendar_name: String,
    /// Request timeout for REST calls
    pub timeout_secs: u64,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            transport: TransportType::Stdio,
            http_port: 8080,
            calendar_name: "Redwood Digital University".to_string(),
            timeout_secs: 30,
        }
    }
}
