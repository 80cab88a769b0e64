//! Process-wide cache of one connection pool per configuration-store path.
//!
//! [`PoolRegistry`] stores lazily-created [`MySqlPool`] handles in a
//! `RwLock<HashMap<...>>`. A pool is created on first use of its path
//! and reused for the lifetime of the process; it is never closed or
//! rebuilt when the stored configuration changes.

use std::collections::HashMap;
use std::time::Duration;

use sqlx::MySqlPool;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use tokio::sync::RwLock;

use super::DbConfig;
use crate::error::GatewayError;

/// Central store of datacenter connection pools.
///
/// Keyed by configuration-store path rather than by config contents,
/// so a changed store record for the same datacenter keeps hitting the
/// pool built from the first-seen config until restart.
///
/// # Concurrency
///
/// Concurrent first-time requests for the same key may each build a
/// pool; the write lock is re-checked so exactly one wins and the
/// loser is dropped without ever having opened a connection.
#[derive(Debug, Default)]
pub struct PoolRegistry {
    pools: RwLock<HashMap<String, MySqlPool>>,
}

impl PoolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pools: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the pool for `key`, creating it from `config` on first use.
    ///
    /// On a cache hit the supplied config is ignored entirely — not
    /// even its port is parsed. Pool construction is lazy: no
    /// connection is attempted here, so connectivity is only proven by
    /// the first query a caller issues.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PoolCreationError`] when the config
    /// cannot produce connect options (e.g. unparsable port).
    pub async fn get_or_create(
        &self,
        key: &str,
        config: &DbConfig,
    ) -> Result<MySqlPool, GatewayError> {
        if let Some(pool) = self.pools.read().await.get(key) {
            return Ok(pool.clone());
        }

        let pool = build_pool(config)?;

        let mut map = self.pools.write().await;
        // Another request may have won the race while we were building.
        if let Some(existing) = map.get(key) {
            return Ok(existing.clone());
        }
        map.insert(key.to_string(), pool.clone());
        Ok(pool)
    }

    /// Returns the number of cached pools.
    pub async fn len(&self) -> usize {
        self.pools.read().await.len()
    }

    /// Returns `true` if no pool has been created yet.
    pub async fn is_empty(&self) -> bool {
        self.pools.read().await.is_empty()
    }
}

/// Builds a lazy pool from a validated config.
fn build_pool(config: &DbConfig) -> Result<MySqlPool, GatewayError> {
    let options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port()?)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name);

    let mut pool_options = MySqlPoolOptions::new().max_connections(config.max_open());
    if let Some(idle) = config.conns_max_idle {
        pool_options = pool_options.min_connections(idle);
    }
    if let Some(lifetime) = config.conn_max_lifetime_secs {
        pool_options = pool_options.max_lifetime(Duration::from_secs(lifetime));
    }

    Ok(pool_options.connect_lazy_with(options))
}
