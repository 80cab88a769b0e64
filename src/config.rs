//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Database credentials are *not*
//! configured here — they are resolved per-datacenter from the
//! configuration store at request time.

use std::net::SocketAddr;

use crate::etcd::{ApiVersion, EtcdSettings};

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Configuration-store access settings.
    ///
    /// A missing endpoint is not a startup error: it surfaces as a
    /// per-request failure so the health endpoint stays useful while
    /// the store address is being provisioned.
    pub etcd: EtcdSettings,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let endpoint = std::env::var("ETCD_ENDPOINT").ok().filter(|s| !s.is_empty());
        let api_version = ApiVersion::detect(
            std::env::var("ETCD_API_VERSION").ok().as_deref(),
            endpoint.as_deref(),
        );

        let username = std::env::var("ETCD_USERNAME").ok().filter(|s| !s.is_empty());
        let password = std::env::var("ETCD_PASSWORD").ok().filter(|s| !s.is_empty());
        let basic_auth = username.map(|user| (user, password));

        Ok(Self {
            listen_addr,
            etcd: EtcdSettings {
                endpoint,
                api_version,
                basic_auth,
            },
        })
    }
}
