//! Configuration types.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reasons a merged configuration is unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("auth.api_keys must contain at least one non-empty key")]
    NoApiKeys,
    #[error("auth.header must not be empty")]
    EmptyHeader,
    #[error("auth.header '{0}' is not a valid HTTP header name")]
    InvalidHeader(String),
    #[error("invalid listen address {host}:{port}")]
    InvalidAddress { host: String, port: u16 },
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

/// HTTP listener and storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            host: default_host(),
            port: default_port(),
        }
    }
}

/// API-key gate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Request header carrying the key.
    #[serde(default = "default_auth_header")]
    pub header: String,

    /// Accepted keys.
    #[serde(default = "default_api_keys")]
    pub api_keys: Vec<String>,

    /// Path prefixes reachable without a key.
    #[serde(default = "default_whitelist")]
    pub whitelist: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            header: default_auth_header(),
            api_keys: default_api_keys(),
            whitelist: default_whitelist(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("tasks-api/tasks.db")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_auth_header() -> String {
    "X-API-KEY".to_string()
}

fn default_api_keys() -> Vec<String> {
    vec!["Guillermo".to_string()]
}

fn default_whitelist() -> Vec<String> {
    vec!["/api/health".to_string()]
}

impl Config {
    /// Load configuration from a single YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Check the settings the server cannot start without.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.auth.header.trim().is_empty() {
            return Err(ConfigError::EmptyHeader);
        }
        if axum::http::HeaderName::from_bytes(self.auth.header.as_bytes()).is_err() {
            return Err(ConfigError::InvalidHeader(self.auth.header.clone()));
        }
        if !self.auth.api_keys.iter().any(|k| !k.is_empty()) {
            return Err(ConfigError::NoApiKeys);
        }
        self.listen_addr()?;
        Ok(())
    }

    /// Socket address the HTTP server binds to.
    pub fn listen_addr(&self) -> std::result::Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress {
                host: self.server.host.clone(),
                port: self.server.port,
            })
    }

    /// Ensure the database directory exists.
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.server.db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
