//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::OutboxService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Outbox service for all business logic.
    pub service: Arc<OutboxService>,
}
