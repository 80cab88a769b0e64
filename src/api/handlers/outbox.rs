//! Outbox control endpoints: connect/validate, status check, status reset.
//!
//! All three share the same validation rules: `datacenter` must name a
//! known datacenter and `aggregateId` must be a well-formed UUID, both
//! checked before any config-store or database I/O.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{
    AggregateRequest, ConnectRequest, ConnectResponse, DbSummary, ResetResponse, StatusResponse,
};
use crate::app_state::AppState;
use crate::domain::Datacenter;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /api/db/connect` — Validate connectivity to a datacenter.
///
/// # Errors
///
/// Returns [`GatewayError`] on an unknown datacenter or when config
/// resolution, pool creation, or the probe query fails.
#[utoipa::path(
    post,
    path = "/api/db/connect",
    tag = "Outbox",
    summary = "Validate datacenter connectivity",
    description = "Resolves the datacenter's database config from the configuration store, \
                   obtains its pool, and issues a probe query.",
    request_body = ConnectRequest,
    responses(
        (status = 200, description = "Database reachable", body = ConnectResponse),
        (status = 400, description = "Missing or unknown datacenter", body = ErrorResponse),
        (status = 502, description = "Configuration store failure", body = ErrorResponse),
        (status = 500, description = "Pool or database failure", body = ErrorResponse),
    )
)]
pub async fn connect(
    State(state): State<AppState>,
    Json(req): Json<ConnectRequest>,
) -> Result<Json<ConnectResponse>, GatewayError> {
    let datacenter = require_datacenter(req.datacenter.as_deref())?;
    let config = state.service.connect(datacenter).await?;
    Ok(Json(ConnectResponse {
        ok: true,
        datacenter: datacenter.code().to_string(),
        db: DbSummary {
            host: config.host,
            name: config.name,
        },
    }))
}

/// `POST /api/status/check` — Read an outbox record's delivery status.
///
/// # Errors
///
/// Returns [`GatewayError`] on invalid input or downstream failure. A
/// missing record is not an error: the body carries `status: null`.
#[utoipa::path(
    post,
    path = "/api/status/check",
    tag = "Outbox",
    summary = "Check outbox record status",
    description = "Reads the status column of the outbox record with the given aggregate id. \
                   Returns null when no record matches.",
    request_body = AggregateRequest,
    responses(
        (status = 200, description = "Status read (possibly null)", body = StatusResponse),
        (status = 400, description = "Invalid datacenter or aggregate id", body = ErrorResponse),
        (status = 502, description = "Configuration store failure", body = ErrorResponse),
        (status = 500, description = "Pool or database failure", body = ErrorResponse),
    )
)]
pub async fn check_status(
    State(state): State<AppState>,
    Json(req): Json<AggregateRequest>,
) -> Result<Json<StatusResponse>, GatewayError> {
    let datacenter = require_datacenter(req.datacenter.as_deref())?;
    let aggregate_id = require_aggregate_id(req.aggregate_id.as_deref())?;
    let status = state.service.check_status(datacenter, aggregate_id).await?;
    Ok(Json(StatusResponse { status }))
}

/// `POST /api/status/update` — Reset an outbox record to `PENDING`.
///
/// Deletes the record's delivery receipts and resets its status in one
/// atomic transaction, so the downstream dispatcher picks it up again.
///
/// # Errors
///
/// Returns [`GatewayError`] on invalid input or downstream failure;
/// the transaction is rolled back before any failure surfaces. A
/// missing aggregate yields `updatedRows: 0` rather than an error.
#[utoipa::path(
    post,
    path = "/api/status/update",
    tag = "Outbox",
    summary = "Reset outbox record to PENDING",
    description = "Deletes all delivery receipts for the aggregate and resets the outbox \
                   record's status to PENDING in a single transaction.",
    request_body = AggregateRequest,
    responses(
        (status = 200, description = "Reset committed", body = ResetResponse),
        (status = 400, description = "Invalid datacenter or aggregate id", body = ErrorResponse),
        (status = 502, description = "Configuration store failure", body = ErrorResponse),
        (status = 500, description = "Pool or transaction failure", body = ErrorResponse),
    )
)]
pub async fn reset_status(
    State(state): State<AppState>,
    Json(req): Json<AggregateRequest>,
) -> Result<Json<ResetResponse>, GatewayError> {
    let datacenter = require_datacenter(req.datacenter.as_deref())?;
    let aggregate_id = require_aggregate_id(req.aggregate_id.as_deref())?;
    let outcome = state.service.reset(datacenter, aggregate_id).await?;
    Ok(Json(ResetResponse {
        ok: true,
        deleted_count: outcome.deleted_count,
        deleted_ids: outcome.deleted_ids,
        updated_rows: outcome.updated_rows,
    }))
}

/// Outbox control routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/db/connect", post(connect))
        .route("/status/check", post(check_status))
        .route("/status/update", post(reset_status))
}

/// Validates the `datacenter` field against the known enumeration.
fn require_datacenter(raw: Option<&str>) -> Result<Datacenter, GatewayError> {
    raw.ok_or_else(|| GatewayError::InvalidRequest("datacenter is required".to_string()))?
        .parse()
}

/// Validates the `aggregateId` field as a well-formed UUID.
fn require_aggregate_id(raw: Option<&str>) -> Result<Uuid, GatewayError> {
    let raw =
        raw.ok_or_else(|| GatewayError::InvalidRequest("aggregateId is required".to_string()))?;
    Uuid::parse_str(raw)
        .map_err(|_| GatewayError::InvalidRequest(format!("malformed aggregate id: {raw}")))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::PoolRegistry;
    use crate::etcd::{ApiVersion, EtcdResolver, EtcdSettings};
    use crate::service::OutboxService;

    /// State with no config-store endpoint: any request that passes
    /// validation would fail with `MissingEndpoint`, so observing
    /// `InvalidRequest` proves validation ran before I/O.
    fn state() -> AppState {
        let resolver = EtcdResolver::new(EtcdSettings {
            endpoint: None,
            api_version: ApiVersion::V2,
            basic_auth: None,
        });
        AppState {
            service: Arc::new(OutboxService::new(resolver, Arc::new(PoolRegistry::new()))),
        }
    }

    #[tokio::test]
    async fn connect_rejects_missing_datacenter() {
        let result = connect(State(state()), Json(ConnectRequest { datacenter: None })).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn connect_rejects_unknown_datacenter() {
        let req = ConnectRequest {
            datacenter: Some("TESP99".to_string()),
        };
        let result = connect(State(state()), Json(req)).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn check_rejects_malformed_aggregate_id() {
        let req = AggregateRequest {
            datacenter: Some("TECE01".to_string()),
            aggregate_id: Some("not-a-uuid".to_string()),
        };
        let result = check_status(State(state()), Json(req)).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn reset_rejects_missing_aggregate_id() {
        let req = AggregateRequest {
            datacenter: Some("TESP02".to_string()),
            aggregate_id: None,
        };
        let result = reset_status(State(state()), Json(req)).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn valid_input_reaches_the_resolver() {
        let req = AggregateRequest {
            datacenter: Some("TECE01".to_string()),
            aggregate_id: Some(Uuid::new_v4().to_string()),
        };
        let result = check_status(State(state()), Json(req)).await;
        assert!(matches!(result, Err(GatewayError::MissingEndpoint)));
    }
}
