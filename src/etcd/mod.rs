//! Configuration-store access: resolves datacenter codes to DB configs.
//!
//! The store is an etcd-style key-value service reachable over HTTP in
//! one of two wire protocols (v2 path reads, v3 range RPC), selected
//! by configuration. The resolver performs a fresh read on every call;
//! the only caching in the gateway is pool reuse in the registry.

pub mod resolver;

pub use resolver::{ApiVersion, EtcdResolver, EtcdSettings};
