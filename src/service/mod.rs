//! Service layer: orchestrates config resolution, pools, and SQL.

pub mod outbox_service;

pub use outbox_service::OutboxService;
