//! # outbox-reset-gateway
//!
//! REST control plane for reprocessing outbox records across
//! independently-configured datacenters.
//!
//! An operator names a datacenter and an aggregate UUID; the gateway
//! resolves that datacenter's database credentials from an etcd-style
//! configuration store, reuses a process-wide connection pool per
//! datacenter, and atomically flips the record's delivery status from
//! `SENT` back to `PENDING` — deleting its delivery receipts in the
//! same transaction so the downstream dispatcher retries from scratch.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── OutboxService (service/)
//!     │
//!     ├── EtcdResolver (etcd/)        per-request config fetch
//!     ├── PoolRegistry (domain/)      one MySQL pool per datacenter
//!     │
//!     └── OutboxStore (persistence/)  transactional reset + reads
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod etcd;
pub mod persistence;
pub mod service;
