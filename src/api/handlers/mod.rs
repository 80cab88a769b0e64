//! REST endpoint handlers.

pub mod outbox;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes the outbox control routes mounted under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new().merge(outbox::routes())
}
