//! Configuration management for the Transcript Annotator

use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Where the sync adapter submits annotations
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    pub endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: "sqlite:./annotations.db".to_string(),
            },
            sync: SyncConfig {
                endpoint: "http://localhost:8000".to_string(),
            },
        }
    }
}

impl Config {
    /// Read settings from the environment; unset variables take their defaults
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .unwrap_or(8000),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:./annotations.db".to_string()),
            },
            sync: SyncConfig {
                endpoint: env::var("ANNOTATION_ENDPOINT")
                    .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            },
        })
    }
}
