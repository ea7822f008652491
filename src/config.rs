// src/config.rs

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::AppError;

/// Which `CatalogStore` implementation the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    MongoDb,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    /// Falls back to the database named in the URI, then `sample_mflix`.
    pub database_name: Option<String>,
    pub movies_collection: String,
    pub comments_collection: String,
    pub max_pool_size: u32,
    pub connect_timeout: Duration,
    pub bind_addr: SocketAddr,
    /// Empty means any origin is allowed.
    pub cors_origins: Vec<String>,
    pub rust_log: String,
    pub log_dir: String,
}

impl Config {
    /// Reads the process environment. `.env` is loaded once by `main`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so it can be
    /// exercised without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage = match var("STORAGE_BACKEND").as_deref().map(str::trim) {
            None | Some("mongodb") | Some("mongo") => StorageBackend::MongoDb,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "STORAGE_BACKEND must be 'mongodb' or 'memory', got '{}'",
                    other
                )));
            }
        };

        let database_url = var("MONGODB_URI");
        if storage == StorageBackend::MongoDb && database_url.is_none() {
            return Err(AppError::Config("MONGODB_URI must be set".to_string()));
        }

        let max_pool_size = parse_or(var("MONGODB_MAX_POOL_SIZE"), "MONGODB_MAX_POOL_SIZE", 10)?;
        let connect_timeout_secs = parse_or(
            var("MONGODB_CONNECT_TIMEOUT_SECS"),
            "MONGODB_CONNECT_TIMEOUT_SECS",
            5,
        )?;
        let bind_addr = parse_or(
            var("BIND_ADDR"),
            "BIND_ADDR",
            SocketAddr::from(([0, 0, 0, 0], 3000)),
        )?;

        let cors_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            storage,
            database_url,
            database_name: var("MONGODB_DB_NAME"),
            movies_collection: var("MONGODB_COLLECTION_NAME").unwrap_or_else(|| "movies".to_string()),
            comments_collection: var("MONGODB_COMMENTS_COLLECTION")
                .unwrap_or_else(|| "comments".to_string()),
            max_pool_size,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            bind_addr,
            cors_origins,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_dir: var("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
        })
    }

    /// Configuration for running against the in-memory store.
    pub fn in_memory() -> Self {
        Self {
            storage: StorageBackend::Memory,
            database_url: None,
            database_name: None,
            movies_collection: "movies".to_string(),
            comments_collection: "comments".to_string(),
            max_pool_size: 10,
            connect_timeout: Duration::from_secs(5),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            cors_origins: Vec::new(),
            rust_log: "error".to_string(),
            log_dir: "logs".to_string(),
        }
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T, AppError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: '{}'", key, value))),
    }
}
