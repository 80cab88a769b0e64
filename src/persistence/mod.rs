//! Persistence layer: outbox reads and the transactional reset.
//!
//! The gateway owns no tables. `outbox` and `outbox_send_receipt` rows
//! belong to the datacenter databases; this layer only reads them and
//! flips statuses, always through a per-datacenter `sqlx::MySqlPool`
//! handed in by the caller.

pub mod models;
pub mod outbox;

pub use models::ResetOutcome;
pub use outbox::OutboxStore;
