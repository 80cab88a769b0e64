//! Config resolver over the etcd v2/v3 HTTP wire protocols.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Datacenter, DbConfig};
use crate::error::GatewayError;

/// Configuration-store wire protocol selector.
///
/// The two protocols are incompatible: v3 is a range-read RPC with
/// base64-encoded keys and values, v2 is a plain path-based GET whose
/// value may arrive bare or wrapped. Both sit behind the single
/// [`EtcdResolver::resolve`] contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// Path-based reads (`GET {endpoint}/{key}`).
    V2,
    /// Range-read RPC (`POST {endpoint}/v3/kv/range`).
    V3,
}

impl ApiVersion {
    /// Picks the protocol from the explicit selector, falling back to
    /// sniffing `/v3` in the endpoint path, defaulting to v2.
    #[must_use]
    pub fn detect(selector: Option<&str>, endpoint: Option<&str>) -> Self {
        if selector == Some("v3") {
            return Self::V3;
        }
        if endpoint.is_some_and(|e| e.contains("/v3")) {
            return Self::V3;
        }
        Self::V2
    }
}

/// Configuration-store access settings, loaded from the environment.
#[derive(Debug, Clone)]
pub struct EtcdSettings {
    /// Base URL of the store. `None` means every resolve fails with
    /// [`GatewayError::MissingEndpoint`]; the process still starts.
    pub endpoint: Option<String>,
    /// Wire protocol to speak.
    pub api_version: ApiVersion,
    /// Optional basic-auth credentials as `(username, password)`.
    pub basic_auth: Option<(String, Option<String>)>,
}

/// Stateless resolver from datacenter code to database configuration.
///
/// Pure function of `(datacenter) -> DbConfig` plus one network read.
/// No caching and no retries: a failed fetch is reported to the caller
/// as a single failed attempt, and every call re-fetches even when a
/// pool already exists for the datacenter's path.
#[derive(Debug, Clone)]
pub struct EtcdResolver {
    http: reqwest::Client,
    settings: EtcdSettings,
}

/// etcd v3 range-read response body.
#[derive(Debug, Deserialize)]
struct RangeResponse {
    #[serde(default)]
    kvs: Vec<RangeKv>,
}

/// One key-value pair in a v3 range response; the value is base64.
#[derive(Debug, Deserialize)]
struct RangeKv {
    #[serde(default)]
    value: Option<String>,
}

impl EtcdResolver {
    /// Creates a resolver with a fresh HTTP client.
    #[must_use]
    pub fn new(settings: EtcdSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    /// Fetches and decodes the database config for a datacenter.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::MissingEndpoint`] when no store address is
    ///   configured for the process.
    /// - [`GatewayError::ConfigStoreUnreachable`] on transport failure
    ///   or a non-success response from the store.
    /// - [`GatewayError::KeyNotFound`] when the store holds no value
    ///   for the datacenter's path.
    /// - [`GatewayError::ConfigDecodeError`] when the payload is not a
    ///   valid config (bad JSON, missing required fields).
    pub async fn resolve(&self, datacenter: Datacenter) -> Result<DbConfig, GatewayError> {
        let key = datacenter.config_path();
        let endpoint = self
            .settings
            .endpoint
            .as_deref()
            .ok_or(GatewayError::MissingEndpoint)?
            .trim_end_matches('/');

        let raw = match self.settings.api_version {
            ApiVersion::V3 => self.read_v3(endpoint, key).await?,
            ApiVersion::V2 => self.read_v2(endpoint, key).await?,
        };

        DbConfig::decode(&raw)
    }

    /// v3 range read: the key goes base64-encoded in a JSON body and
    /// the value comes back base64-encoded in `kvs[0]`.
    async fn read_v3(&self, endpoint: &str, key: &str) -> Result<String, GatewayError> {
        let url = if endpoint.ends_with("/v3/kv/range") {
            endpoint.to_string()
        } else {
            format!("{endpoint}/v3/kv/range")
        };

        let body = serde_json::json!({ "key": BASE64.encode(key) });
        let request = self.authorized(self.http.post(&url)).json(&body);

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::ConfigStoreUnreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(key, %url, %status, %body, "etcd v3 read failed");
            return Err(GatewayError::ConfigStoreUnreachable(format!(
                "etcd read of {key} returned {status}"
            )));
        }

        let payload: RangeResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::ConfigDecodeError(e.to_string()))?;

        let value_b64 = payload
            .kvs
            .into_iter()
            .next()
            .and_then(|kv| kv.value)
            .ok_or_else(|| GatewayError::KeyNotFound(key.to_string()))?;

        let bytes = BASE64
            .decode(value_b64)
            .map_err(|e| GatewayError::ConfigDecodeError(format!("invalid base64 value: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| GatewayError::ConfigDecodeError(format!("non-utf8 value: {e}")))
    }

    /// v2 path read: the value may be the bare payload, a `{"value"}`
    /// wrapper, or the classic `{"node": {"value"}}` wrapper.
    async fn read_v2(&self, endpoint: &str, key: &str) -> Result<String, GatewayError> {
        let url = if key.starts_with('/') {
            format!("{endpoint}{key}")
        } else {
            format!("{endpoint}/{key}")
        };

        let response = self
            .authorized(self.http.get(&url))
            .send()
            .await
            .map_err(|e| GatewayError::ConfigStoreUnreachable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::KeyNotFound(key.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(key, %url, %status, %body, "etcd v2 read failed");
            return Err(GatewayError::ConfigStoreUnreachable(format!(
                "etcd read of {key} returned {status}"
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::ConfigDecodeError(e.to_string()))?;
        Ok(unwrap_value(payload))
    }

    /// Attaches basic auth when credentials are configured.
    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.settings.basic_auth {
            Some((user, pass)) => request.basic_auth(user, pass.as_deref()),
            None => request,
        }
    }
}

/// Unwraps the stored value from its optional envelope and returns the
/// raw config JSON text.
fn unwrap_value(payload: Value) -> String {
    let inner = payload
        .get("value")
        .cloned()
        .or_else(|| payload.pointer("/node/value").cloned())
        .unwrap_or(payload);
    match inner {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
