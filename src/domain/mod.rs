//! Domain layer: datacenter codes, database configs, and the pool cache.
//!
//! This module contains the gateway's core types: the closed set of
//! datacenter codes with their configuration-store paths, the decoded
//! per-datacenter database configuration, and the process-wide
//! connection pool registry.

pub mod datacenter;
pub mod db_config;
pub mod pool_registry;

pub use datacenter::Datacenter;
pub use db_config::DbConfig;
pub use pool_registry::PoolRegistry;
