//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Invalid
//! input is rejected before any network or database I/O and maps to a
//! client-error status; everything downstream (config store, pool,
//! database) maps to a server-error status. No variant is ever retried
//! by this service — each failure is reported as a single failed
//! attempt.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// { "error": "unknown datacenter: TESP99" }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// Variants split into two classes: [`GatewayError::InvalidRequest`]
/// is caused by bad caller input and is detected synchronously, before
/// any I/O; all other variants originate downstream (config store,
/// pool construction, database) and are propagated unchanged to the
/// request boundary.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed (missing field, unknown datacenter,
    /// malformed aggregate UUID). Never reaches the config store or
    /// database layer.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No configuration-store endpoint is configured for this process.
    #[error("config store endpoint is not configured (set ETCD_ENDPOINT)")]
    MissingEndpoint,

    /// The configuration store could not be reached or returned a
    /// non-success response.
    #[error("config store unreachable: {0}")]
    ConfigStoreUnreachable(String),

    /// The configuration store holds no value for the requested path.
    #[error("config store key not found: {0}")]
    KeyNotFound(String),

    /// The configuration payload is not valid JSON or is missing
    /// required fields.
    #[error("failed to decode db config: {0}")]
    ConfigDecodeError(String),

    /// Connection pool construction failed (e.g. unparsable port).
    #[error("failed to create connection pool: {0}")]
    PoolCreationError(String),

    /// The reset transaction aborted; all of its mutations were rolled
    /// back before this error was raised.
    #[error("outbox reset transaction failed: {0}")]
    TransactionFailed(#[source] sqlx::Error),

    /// A single-statement read or probe query failed.
    #[error("query failed: {0}")]
    QueryFailed(#[source] sqlx::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::ConfigStoreUnreachable(_) | Self::KeyNotFound(_) | Self::ConfigDecodeError(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::MissingEndpoint
            | Self::PoolCreationError(_)
            | Self::TransactionFailed(_)
            | Self::QueryFailed(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` for failures caused by caller input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_is_client_error() {
        let err = GatewayError::InvalidRequest("datacenter is required".to_string());
        assert!(err.is_client_error());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn downstream_errors_are_server_class() {
        let unreachable = GatewayError::ConfigStoreUnreachable("connection refused".to_string());
        assert!(!unreachable.is_client_error());
        assert_eq!(unreachable.status_code(), StatusCode::BAD_GATEWAY);

        let missing = GatewayError::MissingEndpoint;
        assert_eq!(missing.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let pool = GatewayError::PoolCreationError("invalid port: abc".to_string());
        assert_eq!(pool.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_response_shape_is_flat() {
        let err = GatewayError::KeyNotFound("/nemesis-api/env-tece1".to_string());
        let body = ErrorResponse {
            error: err.to_string(),
        };
        let Ok(json) = serde_json::to_value(&body) else {
            panic!("serialization failed");
        };
        assert!(json.get("error").is_some_and(serde_json::Value::is_string));
    }
}
