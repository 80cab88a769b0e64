//! Request and response bodies for the outbox control endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /api/db/connect`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConnectRequest {
    /// Datacenter code (e.g. `"TECE01"`).
    #[serde(default)]
    pub datacenter: Option<String>,
}

/// Request body for `POST /api/status/check` and `POST /api/status/update`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AggregateRequest {
    /// Datacenter code (e.g. `"TECE01"`).
    #[serde(default)]
    pub datacenter: Option<String>,
    /// Outbox aggregate identifier (UUID).
    #[serde(rename = "aggregateId", default)]
    pub aggregate_id: Option<String>,
}

/// Response body for `POST /api/db/connect`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectResponse {
    /// Always `true` on success.
    pub ok: bool,
    /// Echo of the validated datacenter code.
    pub datacenter: String,
    /// Summary of the database the probe landed on.
    pub db: DbSummary,
}

/// Non-sensitive subset of the resolved database config.
#[derive(Debug, Serialize, ToSchema)]
pub struct DbSummary {
    /// Database host.
    pub host: String,
    /// Database (schema) name.
    pub name: String,
}

/// Response body for `POST /api/status/check`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// Current delivery status, or `null` when no row matches.
    pub status: Option<String>,
}

/// Response body for `POST /api/status/update`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResetResponse {
    /// Always `true` on success.
    pub ok: bool,
    /// Number of delivery receipts deleted.
    #[serde(rename = "deletedCount")]
    pub deleted_count: u64,
    /// Identifiers of the deleted receipts; empty means there was
    /// nothing to reprocess.
    #[serde(rename = "deletedIds")]
    pub deleted_ids: Vec<String>,
    /// Rows affected by the status update (0 when the aggregate does
    /// not exist).
    #[serde(rename = "updatedRows")]
    pub updated_rows: u64,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn reset_response_uses_camel_case() {
        let body = ResetResponse {
            ok: true,
            deleted_count: 3,
            deleted_ids: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            updated_rows: 1,
        };
        let Ok(json) = serde_json::to_value(&body) else {
            panic!("serialization failed");
        };
        assert_eq!(json.get("deletedCount").and_then(serde_json::Value::as_u64), Some(3));
        assert!(json.get("deletedIds").is_some_and(serde_json::Value::is_array));
        assert_eq!(json.get("updatedRows").and_then(serde_json::Value::as_u64), Some(1));
    }

    #[test]
    fn status_response_serializes_null() {
        let Ok(json) = serde_json::to_value(StatusResponse { status: None }) else {
            panic!("serialization failed");
        };
        assert!(json.get("status").is_some_and(serde_json::Value::is_null));
    }

    #[test]
    fn aggregate_request_tolerates_missing_fields() {
        let Ok(req) = serde_json::from_str::<AggregateRequest>("{}") else {
            panic!("deserialization failed");
        };
        assert!(req.datacenter.is_none());
        assert!(req.aggregate_id.is_none());
    }
}
