use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MySql,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(StoreBackend::MySql),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("unknown STORE_BACKEND {other:?}, expected mysql or memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub jwt_secret: String,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub api_prefix: String,

    // Rate limiting, 0 disables
    pub rate_protected_per_min: u32,

    // Air quality widget
    pub weather_api_url: String,
    pub weather_api_key: Option<String>,
    pub aqi_default_city: String,

    pub log_dir: String,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let store_backend: StoreBackend = var_or("STORE_BACKEND", "mysql").parse()?;
        let database_url = env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::MySql && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORE_BACKEND=mysql");
        }

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").context("SERVER_ADDR must be set")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            store_backend,
            database_url,
            api_prefix: var_or("API_PREFIX", "/odata/v4/employee"),
            rate_protected_per_min: var_or("RATE_PROTECTED_PER_MIN", "1000")
                .parse()
                .context("RATE_PROTECTED_PER_MIN must be a non-negative integer")?,
            weather_api_url: var_or("WEATHER_API_URL", "https://api.weatherapi.com/v1"),
            weather_api_key: env::var("WEATHER_API_KEY").ok().filter(|k| !k.is_empty()),
            aqi_default_city: var_or("AQI_DEFAULT_CITY", "Bengaluru"),
            log_dir: var_or("LOG_DIR", "logs"),
        })
    }

    /// Settings for in-process use: memory store, rate limiting off, no weather key.
    pub fn for_memory(jwt_secret: &str) -> Self {
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            jwt_secret: jwt_secret.to_string(),
            store_backend: StoreBackend::Memory,
            database_url: None,
            api_prefix: "/odata/v4/employee".to_string(),
            rate_protected_per_min: 0,
            weather_api_url: "https://api.weatherapi.com/v1".to_string(),
            weather_api_key: None,
            aqi_default_city: "Bengaluru".to_string(),
            log_dir: "logs".to_string(),
        }
    }
}
