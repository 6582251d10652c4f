//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables. Nested keys use
//! `__` as separator, e.g. `JENKINS__ADDRESS` or `DATABASE__MAX_CONNECTIONS`.
//!
//! See [`JenkinsConfig`](devops_credentials_jenkins::JenkinsConfig) for the
//! Jenkins connection settings.

use devops_credentials_jenkins::JenkinsConfig;
use serde::Deserialize;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// PostgreSQL database connection URL.
    pub database_url: String,

    /// Address the HTTP listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Connection pool configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Jenkins connection configuration.
    pub jenkins: JenkinsConfig,
}

/// Database pool configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::default())
    }

    fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.separator("__"))
            .build()?
            .try_deserialize()
    }
}
