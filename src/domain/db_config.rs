//! Per-datacenter database configuration decoded from the store value.

use serde::Deserialize;

use crate::error::GatewayError;

/// Default MySQL port when `DBPort` is absent or empty.
const DEFAULT_PORT: u16 = 3306;

/// Default pool size when `DBConnsMaxOpen` is absent.
const DEFAULT_MAX_OPEN: u32 = 10;

/// Database connection parameters for one datacenter.
///
/// Field names mirror the JSON stored in the configuration store, so
/// serde renames are explicit. `DBPort` is stored as a string there,
/// hence the `String` type and the parsing in [`DbConfig::port`].
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    /// Database host.
    #[serde(rename = "DBHost")]
    pub host: String,
    /// Database port as stored (string, possibly empty).
    #[serde(rename = "DBPort", default)]
    pub port: String,
    /// Database (schema) name.
    #[serde(rename = "DBName")]
    pub name: String,
    /// Database user.
    #[serde(rename = "DBUser")]
    pub user: String,
    /// Database password.
    #[serde(rename = "DBPass")]
    pub password: String,
    /// Maximum idle connections hint.
    #[serde(rename = "DBConnsMaxIdle", default)]
    pub conns_max_idle: Option<u32>,
    /// Maximum open connections hint.
    #[serde(rename = "DBConnsMaxOpen", default)]
    pub conns_max_open: Option<u32>,
    /// Maximum connection lifetime hint, in seconds.
    #[serde(rename = "DBConnMaxLifetime", default)]
    pub conn_max_lifetime_secs: Option<u64>,
}

impl DbConfig {
    /// Decodes a configuration payload and enforces its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigDecodeError`] if the payload is
    /// not valid JSON or any of host, name, user, password is missing
    /// or empty. An invalid config must never reach pool creation.
    pub fn decode(raw: &str) -> Result<Self, GatewayError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| GatewayError::ConfigDecodeError(e.to_string()))?;
        if config.host.is_empty()
            || config.name.is_empty()
            || config.user.is_empty()
            || config.password.is_empty()
        {
            return Err(GatewayError::ConfigDecodeError(
                "missing required DB config fields (host, name, user, password)".to_string(),
            ));
        }
        Ok(config)
    }

    /// Parses the stored port string, defaulting to 3306 when empty.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PoolCreationError`] when the stored
    /// value is non-empty but not a valid port number.
    pub fn port(&self) -> Result<u16, GatewayError> {
        if self.port.is_empty() {
            return Ok(DEFAULT_PORT);
        }
        self.port
            .parse()
            .map_err(|_| GatewayError::PoolCreationError(format!("invalid DBPort: {}", self.port)))
    }

    /// Maximum open connections for the pool, defaulting to 10.
    #[must_use]
    pub fn max_open(&self) -> u32 {
        self.conns_max_open.unwrap_or(DEFAULT_MAX_OPEN)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "DBHost": "db.tece1.internal",
        "DBPort": "3307",
        "DBName": "nemesis",
        "DBUser": "outbox_op",
        "DBPass": "s3cret",
        "DBConnsMaxIdle": 2,
        "DBConnsMaxOpen": 20,
        "DBConnMaxLifetime": 300
    }"#;

    #[test]
    fn decodes_full_payload() {
        let Ok(config) = DbConfig::decode(FULL) else {
            panic!("decode failed");
        };
        assert_eq!(config.host, "db.tece1.internal");
        assert_eq!(config.name, "nemesis");
        assert_eq!(config.max_open(), 20);
        let Ok(port) = config.port() else {
            panic!("port parse failed");
        };
        assert_eq!(port, 3307);
    }

    #[test]
    fn defaults_port_and_pool_size() {
        let raw = r#"{"DBHost":"h","DBName":"n","DBUser":"u","DBPass":"p"}"#;
        let Ok(config) = DbConfig::decode(raw) else {
            panic!("decode failed");
        };
        let Ok(port) = config.port() else {
            panic!("empty port should default");
        };
        assert_eq!(port, 3306);
        assert_eq!(config.max_open(), 10);
    }

    #[test]
    fn rejects_missing_required_fields() {
        let payloads = [
            r#"{"DBName":"n","DBUser":"u","DBPass":"p"}"#,
            r#"{"DBHost":"h","DBUser":"u","DBPass":"p"}"#,
            r#"{"DBHost":"h","DBName":"n","DBPass":"p"}"#,
            r#"{"DBHost":"h","DBName":"n","DBUser":"u"}"#,
            r#"{"DBHost":"","DBName":"n","DBUser":"u","DBPass":"p"}"#,
        ];
        for raw in payloads {
            let result = DbConfig::decode(raw);
            assert!(
                matches!(result, Err(GatewayError::ConfigDecodeError(_))),
                "expected decode rejection for {raw}"
            );
        }
    }

    #[test]
    fn rejects_non_json_payload() {
        let result = DbConfig::decode("host=db;user=root");
        assert!(matches!(result, Err(GatewayError::ConfigDecodeError(_))));
    }

    #[test]
    fn rejects_unparsable_port() {
        let raw = r#"{"DBHost":"h","DBPort":"not-a-port","DBName":"n","DBUser":"u","DBPass":"p"}"#;
        let Ok(config) = DbConfig::decode(raw) else {
            panic!("decode failed");
        };
        assert!(matches!(
            config.port(),
            Err(GatewayError::PoolCreationError(_))
        ));
    }
}
