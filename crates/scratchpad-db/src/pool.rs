//! Database connection pool management.
//!
//! The pool is sized by `DB_MAX_CONNECTIONS`. Its acquire timeout is derived
//! from the service's per-call deadline so that an exhausted pool surfaces as
//! [`Error::Unavailable`] from the store before the service gives up.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use scratchpad_core::defaults::STORE_TIMEOUT_SECS;
use scratchpad_core::{Error, Result};

/// Default maximum number of connections in the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Lower bound on the acquire timeout.
const MIN_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(1);

/// Connections kept open while idle.
const MIN_IDLE_CONNECTIONS: u32 = 1;

/// Pool sizing and acquire behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    /// How long a store call waits for a free connection.
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_CONNECTIONS,
            Duration::from_secs(STORE_TIMEOUT_SECS),
        )
    }
}

impl PoolConfig {
    /// Pool for a service whose store calls are bounded by `store_deadline`.
    ///
    /// Waiting for a connection may use at most half the deadline, leaving
    /// the rest for the statement itself.
    pub fn new(max_connections: u32, store_deadline: Duration) -> Self {
        Self {
            max_connections: max_connections.max(1),
            acquire_timeout: (store_deadline / 2).max(MIN_ACQUIRE_TIMEOUT),
        }
    }
}

/// Open a pool and verify it can reach the server.
pub async fn create_pool(database_url: &str, config: PoolConfig) -> Result<PgPool> {
    let start = Instant::now();

    info!(
        subsystem = "db",
        component = "pool",
        op = "create",
        max_connections = config.max_connections,
        acquire_timeout_ms = config.acquire_timeout.as_millis() as u64,
        "Creating database connection pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(MIN_IDLE_CONNECTIONS.min(config.max_connections))
        .acquire_timeout(config.acquire_timeout)
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "db",
        component = "pool",
        op = "established",
        pool_size = pool.size(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Database connection pool established"
    );
    Ok(pool)
}

/// Log current pool usage, warning when every connection is checked out.
pub fn log_pool_metrics(pool: &PgPool) {
    let size = pool.size();
    let idle = pool.num_idle();

    debug!(
        subsystem = "db",
        component = "pool",
        op = "metrics",
        pool_size = size,
        pool_idle = idle,
        "Pool usage"
    );

    if idle == 0 && size > 0 {
        warn!(
            subsystem = "db",
            component = "pool",
            pool_size = size,
            "Connection pool has no idle connections"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_timeout_is_half_the_deadline() {
        let config = PoolConfig::new(20, Duration::from_secs(10));
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_acquire_timeout_has_floor() {
        let config = PoolConfig::new(4, Duration::from_millis(500));
        assert_eq!(config.acquire_timeout, MIN_ACQUIRE_TIMEOUT);
    }

    #[test]
    fn test_zero_connections_is_raised_to_one() {
        assert_eq!(PoolConfig::new(0, Duration::from_secs(10)).max_connections, 1);
    }

    #[test]
    fn test_default_stays_below_store_deadline() {
        let config = PoolConfig::default();
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(config.acquire_timeout < Duration::from_secs(STORE_TIMEOUT_SECS));
    }
}
