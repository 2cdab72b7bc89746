//! Server configuration read from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | `postgres://localhost/scratchpad` |
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `7521` |
//! | `STORE_BACKEND` | `postgres` (`postgres` or `memory`) |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `STORE_TIMEOUT_SECS` | `10` |
//! | `RUN_MIGRATIONS` | `true` |
//! | `LOG_FORMAT` | `text` (`text` or `json`) |
//! | `LOG_FILE` | unset (stdout) |
//! | `LOG_ANSI` | auto |
//!
//! Malformed numbers fall back to their defaults. An unknown store backend
//! is an error, since silently picking one would be surprising.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use scratchpad_core::defaults;
use scratchpad_core::{Error, Result};
use scratchpad_db::pool::{PoolConfig, DEFAULT_MAX_CONNECTIONS};

/// Which [`NoteStore`](scratchpad_core::NoteStore) implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(Error::Config(format!(
                "unknown STORE_BACKEND '{}', expected 'postgres' or 'memory'",
                other
            ))),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `json` or `text`.
    pub format: String,
    /// Log file path; enables daily-rotated file output.
    pub file: Option<String>,
    /// Explicit ANSI color override.
    pub ansi: Option<bool>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            format: get("LOG_FORMAT").unwrap_or_else(|| "text".to_string()),
            file: get("LOG_FILE").filter(|f| !f.trim().is_empty()),
            ansi: get("LOG_ANSI").map(|v| v == "true" || v == "1"),
        }
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Typed server configuration, parsed once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub store_backend: StoreBackend,
    pub db_max_connections: u32,
    pub store_timeout: Duration,
    pub run_migrations: bool,
    pub log: LogConfig,
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match get("STORE_BACKEND") {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => StoreBackend::Postgres,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| defaults::SERVER_HOST.to_string()),
            port: parse_or(get("PORT"), defaults::SERVER_PORT),
            database_url: get("DATABASE_URL").unwrap_or_else(|| defaults::DATABASE_URL.to_string()),
            store_backend,
            db_max_connections: parse_or(get("DB_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS),
            store_timeout: Duration::from_secs(parse_or(
                get("STORE_TIMEOUT_SECS"),
                defaults::STORE_TIMEOUT_SECS,
            )),
            run_migrations: get("RUN_MIGRATIONS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            log: LogConfig::from_lookup(&get),
        })
    }

    /// Pool settings for the Postgres store. The acquire timeout is derived
    /// from `store_timeout` so pool exhaustion is reported before the deadline.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.db_max_connections, self.store_timeout)
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid HOST/PORT: {}", e)))
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
