use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub redis_url: String,
    pub redis_prefix: String,
    pub redis_retries: usize,
    pub redis_timeout: Duration,
}

/// Same values as an empty environment, except the store is kept in memory.
impl Default for Config {
    fn default() -> Self {
        Self {
            port: 1111,
            store_backend: StoreBackend::Memory,
            redis_url: "redis://redis:6379".to_string(),
            redis_prefix: "courses".to_string(),
            redis_retries: 1,
            redis_timeout: Duration::from_millis(100),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let redis_url: String = try_load("REDIS_URL", "redis://redis:6379")?;

        Ok(Self {
            port: try_load("RUST_PORT", "1111")?,
            store_backend: try_load("STORE_BACKEND", "redis")?,
            redis_url: with_password(&redis_url, read_secret("REDIS_PASSWORD")),
            redis_prefix: try_load("REDIS_KEY_PREFIX", "courses")?,
            redis_retries: try_load("REDIS_RETRIES", "1")?,
            redis_timeout: Duration::from_millis(try_load("REDIS_TIMEOUT_MS", "100")?),
        })
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            info!("Secret {secret_name} not mounted, continuing without it: {e}");
        })
        .ok()
        .filter(|s| !s.is_empty())
}

fn with_password(redis_url: &str, password: Option<String>) -> String {
    match password {
        Some(password) if !redis_url.contains('@') => {
            redis_url.replacen("://", &format!("://:{password}@"), 1)
        }
        _ => redis_url.to_string(),
    }
}
