use crate::field::{ConfigSchema, FieldSpec, ValueKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::{Validate, ValidationError};

/// WebSocket server settings.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Listener, TLS, handshake and frame limits, compression, connection caps
/// and graceful shutdown for a WebSocket endpoint, plus the per-session
/// keep-alive policy in `session`. `port` and `max_connections_per_ip` are
/// required.
///
/// ## Fields
/// - `enabled`: Server switch (default: true)
/// - `host` / `port` / `path`: Endpoint (default host 0.0.0.0, path "/ws")
/// - `enable_tls`, `cert_file`, `key_file`: TLS (`WS_CERT_FILE`,
///   `WS_KEY_FILE`)
/// - `handshake_timeout`: Upgrade budget (default: 5s)
/// - `read_buffer_size` / `write_buffer_size`: Per-connection buffers (4KB)
/// - `max_message_read_size`: Largest inbound message in bytes (64KB)
/// - `enable_compression` / `compression_level`: permessage-deflate
/// - `allowed_origins`: Empty or `["*"]` accepts every origin
/// - `subprotocols`: Offered subprotocols
/// - `max_connections`: Global cap, zero for unlimited
/// - `max_connections_per_ip`: Per-address cap, written as
///   `maxConnectionsPerIP`
/// - `shutdown_timeout`: Graceful shutdown budget (default: 10s)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ws {
    pub enabled: bool,

    pub host: String,

    #[validate(range(min = 1, max = 65535))]
    pub port: u16,

    #[validate(custom(function = "validate_ws_path"))]
    pub path: String,

    #[serde(rename = "enableTLS")]
    pub enable_tls: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,

    #[serde(with = "crate::duration")]
    pub handshake_timeout: Duration,

    pub read_buffer_size: usize,

    pub write_buffer_size: usize,

    pub max_message_read_size: u64,

    pub enable_compression: bool,

    #[validate(range(min = -1, max = 9))]
    pub compression_level: i32,

    pub allowed_origins: Vec<String>,

    pub subprotocols: Vec<String>,

    pub max_connections: u32,

    #[serde(rename = "maxConnectionsPerIP")]
    pub max_connections_per_ip: u32,

    #[serde(with = "crate::duration")]
    pub shutdown_timeout: Duration,

    #[validate(nested)]
    pub session: WsSession,
}

fn validate_ws_path(value: &str) -> Result<(), ValidationError> {
    if value.starts_with('/') {
        Ok(())
    } else {
        Err(ValidationError::new("WebSocket path must start with /"))
    }
}

impl ConfigSchema for Ws {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::boolean("enabled").env("WS_ENABLED").default("true"),
            FieldSpec::string("host").env("WS_HOST").default("0.0.0.0"),
            FieldSpec::integer("port").env("WS_PORT").required(),
            FieldSpec::string("path").env("WS_PATH").default("/ws"),
            FieldSpec::boolean("enableTLS").env("WS_ENABLE_TLS").default("false"),
            FieldSpec::string("certFile").env("WS_CERT_FILE"),
            FieldSpec::string("keyFile").env("WS_KEY_FILE"),
            FieldSpec::duration("handshakeTimeout")
                .env("WS_HANDSHAKE_TIMEOUT")
                .default("5s"),
            FieldSpec::integer("readBufferSize")
                .env("WS_READ_BUFFER_SIZE")
                .default("4096"),
            FieldSpec::integer("writeBufferSize")
                .env("WS_WRITE_BUFFER_SIZE")
                .default("4096"),
            FieldSpec::integer("maxMessageReadSize")
                .env("WS_MAX_MESSAGE_READ_SIZE")
                .default("65536"),
            FieldSpec::boolean("enableCompression")
                .env("WS_ENABLE_COMPRESSION")
                .default("false"),
            FieldSpec::integer("compressionLevel")
                .env("WS_COMPRESSION_LEVEL")
                .default("-1"),
            FieldSpec::list("allowedOrigins", ValueKind::String)
                .env("WS_ALLOWED_ORIGINS")
                .default(""),
            FieldSpec::list("subprotocols", ValueKind::String)
                .env("WS_SUBPROTOCOLS")
                .default(""),
            FieldSpec::integer("maxConnections")
                .env("WS_MAX_CONNECTIONS")
                .default("0"),
            FieldSpec::integer("maxConnectionsPerIP")
                .env("WS_MAX_CONNECTIONS_PER_IP")
                .required(),
            FieldSpec::duration("shutdownTimeout")
                .env("WS_SHUTDOWN_TIMEOUT")
                .default("10s"),
            FieldSpec::nested("session", WsSession::fields),
        ]
    }
}

/// Per-connection session policy.
///
/// Zero for `max_idle_time` or `max_lifetime` disables that limit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WsSession {
    pub enable_ping: bool,

    #[serde(with = "crate::duration")]
    pub ping_interval: Duration,

    #[serde(with = "crate::duration")]
    pub pong_timeout: Duration,

    #[serde(with = "crate::duration")]
    pub max_idle_time: Duration,

    /// Queued outbound messages per client
    #[validate(range(min = 1))]
    pub outbound_message_buffer_size: usize,

    #[serde(with = "crate::duration")]
    pub write_timeout: Duration,

    #[serde(with = "crate::duration")]
    pub max_lifetime: Duration,
}

impl ConfigSchema for WsSession {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::boolean("enablePing")
                .env("WS_SESSION_ENABLE_PING")
                .default("true"),
            FieldSpec::duration("pingInterval")
                .env("WS_SESSION_PING_INTERVAL")
                .default("30s"),
            FieldSpec::duration("pongTimeout")
                .env("WS_SESSION_PONG_TIMEOUT")
                .default("10s"),
            FieldSpec::duration("maxIdleTime")
                .env("WS_SESSION_MAX_IDLE_TIME")
                .default("60s"),
            FieldSpec::integer("outboundMessageBufferSize")
                .env("WS_SESSION_OUTBOUND_MESSAGE_BUFFER_SIZE")
                .default("256"),
            FieldSpec::duration("writeTimeout")
                .env("WS_SESSION_WRITE_TIMEOUT")
                .default("5s"),
            FieldSpec::duration("maxLifetime")
                .env("WS_SESSION_MAX_LIFETIME")
                .default("0s"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_loader::FileFormat;
    use crate::loader::ConfigLoader;
    use configo_errors::ConfigError;
    use std::collections::HashMap;

    #[test]
    fn test_ws_defaults_with_required_fields() {
        let env: HashMap<String, String> = HashMap::new();
        let ws: Ws = ConfigLoader::with_env(env)
            .load_str("port: 8443\nmaxConnectionsPerIP: 10\n", FileFormat::Yaml)
            .unwrap();
        assert!(ws.enabled);
        assert_eq!(ws.path, "/ws");
        assert_eq!(ws.max_message_read_size, 65_536);
        assert_eq!(ws.compression_level, -1);
        assert!(ws.allowed_origins.is_empty());
        assert_eq!(ws.max_connections_per_ip, 10);
        assert_eq!(ws.session.ping_interval, Duration::from_secs(30));
        assert_eq!(ws.session.outbound_message_buffer_size, 256);
        assert_eq!(ws.session.max_lifetime, Duration::ZERO);
        assert!(ws.validate().is_ok());
    }

    #[test]
    fn test_ws_required_fields() {
        let env: HashMap<String, String> = HashMap::new();
        match ConfigLoader::with_env(env).load_str::<Ws>("", FileFormat::Yaml) {
            Err(ConfigError::MissingRequired { fields }) => {
                assert_eq!(fields, vec!["port", "maxConnectionsPerIP"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_ws_session_env_override() {
        let mut env = HashMap::new();
        env.insert("WS_SESSION_ENABLE_PING".to_string(), "F".to_string());
        env.insert("WS_SUBPROTOCOLS".to_string(), "chat,json-rpc".to_string());
        let ws: Ws = ConfigLoader::with_env(env)
            .load_str("port: 8443\nmaxConnectionsPerIP: 10\n", FileFormat::Yaml)
            .unwrap();
        assert!(!ws.session.enable_ping);
        assert_eq!(ws.subprotocols, vec!["chat", "json-rpc"]);
    }
}
