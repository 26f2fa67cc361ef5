//! Environment-variable configuration, read once at startup.
//!
//! Every variable except `FEED_URL` has a default. A malformed value is a
//! fatal startup error rather than a silent fallback.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_DB_HOST: &str = "127.0.0.1";
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_NAME: &str = "calmirror";
const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 600;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    #[error("{name} must be a positive number of seconds, got {value:?}")]
    InvalidInterval { name: &'static str, value: String },

    #[error("{name} is not a valid socket address: {value:?}")]
    InvalidBindAddr { name: &'static str, value: String },
}

#[derive(Clone)]
pub struct Config {
    pub db_host: String,
    pub db_user: String,
    pub db_pass: String,
    pub db_name: String,
    /// Polling period for the reconciliation scheduler.
    pub update_interval: Duration,
    /// Remote feed to mirror.
    pub feed_url: String,
    pub bind_addr: SocketAddr,
}

/// Masks `db_pass` so credentials never reach logs or error output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("db_host", &self.db_host)
            .field("db_user", &self.db_user)
            .field("db_pass", &"[REDACTED]")
            .field("db_name", &self.db_name)
            .field("update_interval", &self.update_interval)
            .field("feed_url", &self.feed_url)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let feed_url = get("FEED_URL").ok_or(ConfigError::Missing("FEED_URL"))?;

        let update_interval = match get("UPDATE_INTERVAL") {
            Some(value) => parse_interval("UPDATE_INTERVAL", &value)?,
            None => Duration::from_secs(DEFAULT_UPDATE_INTERVAL_SECS),
        };

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr {
                name: "BIND_ADDR",
                value: bind_addr.clone(),
            })?;

        Ok(Config {
            db_host: get("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
            db_user: get("DB_USER").unwrap_or_else(|| DEFAULT_DB_USER.to_string()),
            db_pass: get("DB_PASS").unwrap_or_default(),
            db_name: get("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            update_interval,
            feed_url,
            bind_addr,
        })
    }
}

/// The interval is accepted as any numeric literal and truncated to whole
/// seconds, so `UPDATE_INTERVAL=450.9` means 450 seconds.
fn parse_interval(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidInterval {
        name,
        value: value.to_string(),
    };

    let seconds = value.trim().parse::<f64>().map_err(|_| invalid())?;
    if !seconds.is_finite() || seconds.trunc() < 1.0 {
        return Err(invalid());
    }

    Ok(Duration::from_secs(seconds.trunc() as u64))
}
