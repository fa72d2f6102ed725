//! # gRPC Settings
//!
//! One server section plus any number of outbound client sections. Server
//! fields bind to `GRPC_*` variables; client entries live in a list and are
//! configured from the file only.

use crate::field::{ConfigSchema, FieldSpec};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// gRPC server and client settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Grpc {
    #[validate(nested)]
    pub server: GrpcServer,

    #[validate(nested)]
    pub clients: Vec<GrpcClient>,
}

impl ConfigSchema for Grpc {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::nested("server", GrpcServer::fields),
            FieldSpec::nested_list("clients", GrpcClient::fields),
        ]
    }
}

/// gRPC server settings.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Listener, TLS material, keep-alive policy, transport limits and
/// lifecycle timeouts. Only `port` is required.
///
/// ## Fields
/// - `host` / `port`: Listen address (`GRPC_HOST`, `GRPC_PORT`)
/// - `enable_tls`, `cert_file`, `key_file`, `client_ca_file`: TLS and mTLS
/// - `keep_alive_*`: Server keep-alive parameters; zero means unlimited
/// - `keep_alive_enforcement_policy_*`: Limits on client pings
/// - `max_receive_message_size` / `max_send_message_size`: Bytes; zero keeps
///   the transport default
/// - `max_concurrent_streams`, `initial_window_size`,
///   `initial_conn_window_size`: HTTP/2 flow control; zero keeps the default
/// - `read_buffer_size` / `write_buffer_size`: Socket buffers (32KB)
/// - `enable_health_check_service` / `enable_reflection_service`: Built-in
///   services (default: true)
/// - `graceful_shutdown_timeout` / `connection_timeout`: Lifecycle bounds
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GrpcServer {
    pub host: String,

    #[validate(range(min = 1, max = 65535))]
    pub port: u16,

    #[serde(rename = "enableTLS")]
    pub enable_tls: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,

    #[serde(rename = "clientCAFile", default, skip_serializing_if = "Option::is_none")]
    pub client_ca_file: Option<String>,

    #[serde(with = "crate::duration")]
    pub keep_alive_max_connection_idle: Duration,

    #[serde(with = "crate::duration")]
    pub keep_alive_max_connection_age: Duration,

    #[serde(with = "crate::duration")]
    pub keep_alive_max_connection_age_grace: Duration,

    #[serde(with = "crate::duration")]
    pub keep_alive_server_time: Duration,

    #[serde(with = "crate::duration")]
    pub keep_alive_server_timeout: Duration,

    #[serde(with = "crate::duration")]
    pub keep_alive_enforcement_policy_min_time: Duration,

    pub keep_alive_enforcement_policy_permit_without_stream: bool,

    pub max_receive_message_size: usize,

    pub max_send_message_size: usize,

    pub max_concurrent_streams: u32,

    pub initial_window_size: u32,

    pub initial_conn_window_size: u32,

    pub read_buffer_size: usize,

    pub write_buffer_size: usize,

    pub enable_health_check_service: bool,

    pub enable_reflection_service: bool,

    #[serde(with = "crate::duration")]
    pub graceful_shutdown_timeout: Duration,

    #[serde(with = "crate::duration")]
    pub connection_timeout: Duration,
}

impl ConfigSchema for GrpcServer {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::string("host").env("GRPC_HOST").default("0.0.0.0"),
            FieldSpec::integer("port").env("GRPC_PORT").required(),
            FieldSpec::boolean("enableTLS").env("GRPC_ENABLE_TLS").default("false"),
            FieldSpec::string("certFile").env("GRPC_CERT_FILE"),
            FieldSpec::string("keyFile").env("GRPC_KEY_FILE"),
            FieldSpec::string("clientCAFile").env("GRPC_CLIENT_CA_FILE"),
            FieldSpec::duration("keepAliveMaxConnectionIdle")
                .env("GRPC_KEEP_ALIVE_MAX_CONNECTION_IDLE")
                .default("0s"),
            FieldSpec::duration("keepAliveMaxConnectionAge")
                .env("GRPC_KEEP_ALIVE_MAX_CONNECTION_AGE")
                .default("0s"),
            FieldSpec::duration("keepAliveMaxConnectionAgeGrace")
                .env("GRPC_KEEP_ALIVE_MAX_CONNECTION_AGE_GRACE")
                .default("0s"),
            FieldSpec::duration("keepAliveServerTime")
                .env("GRPC_KEEP_ALIVE_SERVER_TIME")
                .default("2h"),
            FieldSpec::duration("keepAliveServerTimeout")
                .env("GRPC_KEEP_ALIVE_SERVER_TIMEOUT")
                .default("20s"),
            FieldSpec::duration("keepAliveEnforcementPolicyMinTime")
                .env("GRPC_KEEP_ALIVE_ENFORCEMENT_MIN_TIME")
                .default("5m"),
            FieldSpec::boolean("keepAliveEnforcementPolicyPermitWithoutStream")
                .env("GRPC_KEEP_ALIVE_ENFORCEMENT_PERMIT_WITHOUT_STREAM")
                .default("false"),
            FieldSpec::integer("maxReceiveMessageSize")
                .env("GRPC_MAX_RECEIVE_MESSAGE_SIZE")
                .default("4194304"),
            FieldSpec::integer("maxSendMessageSize")
                .env("GRPC_MAX_SEND_MESSAGE_SIZE")
                .default("0"),
            FieldSpec::integer("maxConcurrentStreams")
                .env("GRPC_MAX_CONCURRENT_STREAMS")
                .default("0"),
            FieldSpec::integer("initialWindowSize")
                .env("GRPC_INITIAL_WINDOW_SIZE")
                .default("0"),
            FieldSpec::integer("initialConnWindowSize")
                .env("GRPC_INITIAL_CONN_WINDOW_SIZE")
                .default("0"),
            FieldSpec::integer("readBufferSize")
                .env("GRPC_READ_BUFFER_SIZE")
                .default("32768"),
            FieldSpec::integer("writeBufferSize")
                .env("GRPC_WRITE_BUFFER_SIZE")
                .default("32768"),
            FieldSpec::boolean("enableHealthCheckService")
                .env("GRPC_ENABLE_HEALTH_CHECK_SERVICE")
                .default("true"),
            FieldSpec::boolean("enableReflectionService")
                .env("GRPC_ENABLE_REFLECTION_SERVICE")
                .default("true"),
            FieldSpec::duration("gracefulShutdownTimeout")
                .env("GRPC_GRACEFUL_SHUTDOWN_TIMEOUT")
                .default("30s"),
            FieldSpec::duration("connectionTimeout")
                .env("GRPC_CONNECTION_TIMEOUT")
                .default("120s"),
        ]
    }
}

/// Outbound gRPC client settings, one entry per upstream.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GrpcClient {
    pub host: String,

    #[validate(range(min = 1, max = 65535))]
    pub port: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    #[serde(rename = "enableTLS")]
    pub enable_tls: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_cert_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name_override: Option<String>,

    #[validate(range(min = 1))]
    pub connect_max_attempts: u32,

    #[serde(with = "crate::duration")]
    pub connect_initial_backoff: Duration,

    #[serde(with = "crate::duration")]
    pub connect_max_backoff: Duration,

    #[validate(range(min = 1.0))]
    pub connect_backoff_multiplier: f64,

    #[serde(with = "crate::duration")]
    pub dial_timeout: Duration,

    #[serde(with = "crate::duration")]
    pub keep_alive_time: Duration,

    #[serde(with = "crate::duration")]
    pub keep_alive_timeout: Duration,

    pub permit_without_stream: bool,

    pub max_recv_msg_size: usize,

    pub max_send_msg_size: usize,
}

impl ConfigSchema for GrpcClient {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::string("host").required(),
            FieldSpec::integer("port").required(),
            FieldSpec::string("userAgent"),
            FieldSpec::boolean("enableTLS").default("false"),
            FieldSpec::string("caCertFile"),
            FieldSpec::string("clientCertFile"),
            FieldSpec::string("clientKeyFile"),
            FieldSpec::string("serverNameOverride"),
            FieldSpec::integer("connectMaxAttempts").default("5"),
            FieldSpec::duration("connectInitialBackoff").default("250ms"),
            FieldSpec::duration("connectMaxBackoff").default("5s"),
            FieldSpec::float("connectBackoffMultiplier").default("2.0"),
            FieldSpec::duration("dialTimeout").default("5s"),
            FieldSpec::duration("keepAliveTime").default("30s"),
            FieldSpec::duration("keepAliveTimeout").default("20s"),
            FieldSpec::boolean("permitWithoutStream").default("true"),
            FieldSpec::integer("maxRecvMsgSize").default("4194304"),
            FieldSpec::integer("maxSendMsgSize").default("4194304"),
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

    fn loader(pairs: &[(&str, &str)]) -> ConfigLoader<HashMap<String, String>> {
        ConfigLoader::with_env(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_server_port_from_env() {
        let grpc: Grpc = loader(&[("GRPC_PORT", "9090")])
            .load_str("", FileFormat::Yaml)
            .unwrap();
        assert_eq!(grpc.server.port, 9090);
        assert_eq!(grpc.server.host, "0.0.0.0");
        assert_eq!(grpc.server.keep_alive_server_time, Duration::from_secs(7200));
        assert_eq!(grpc.server.keep_alive_max_connection_idle, Duration::ZERO);
        assert_eq!(grpc.server.max_receive_message_size, 4_194_304);
        assert!(grpc.server.enable_reflection_service);
        assert!(grpc.clients.is_empty());
    }

    #[test]
    fn test_clients_get_defaults() {
        let yaml = r"
server:
  port: 9090
  enableTLS: true
  clientCAFile: /etc/ca.pem
clients:
  - host: users
    port: 9001
  - host: billing
    port: 9002
    dialTimeout: 1s
";
        let grpc: Grpc = loader(&[]).load_str(yaml, FileFormat::Yaml).unwrap();
        assert!(grpc.server.enable_tls);
        assert_eq!(grpc.server.client_ca_file.as_deref(), Some("/etc/ca.pem"));
        assert_eq!(grpc.clients.len(), 2);
        assert_eq!(grpc.clients[0].dial_timeout, Duration::from_secs(5));
        assert_eq!(grpc.clients[0].connect_max_attempts, 5);
        assert!((grpc.clients[0].connect_backoff_multiplier - 2.0).abs() < f64::EPSILON);
        assert!(grpc.clients[0].permit_without_stream);
        assert_eq!(grpc.clients[1].dial_timeout, Duration::from_secs(1));
        assert!(grpc.validate().is_ok());
    }

    #[test]
    fn test_client_missing_host_reports_indexed_path() {
        let yaml = "server:\n  port: 9090\nclients:\n  - port: 9001\n";
        match loader(&[]).load_str::<Grpc>(yaml, FileFormat::Yaml) {
            Err(ConfigError::MissingRequired { fields }) => {
                assert_eq!(fields, vec!["clients[0].host"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_server_port() {
        match loader(&[]).load_str::<Grpc>("", FileFormat::Yaml) {
            Err(ConfigError::MissingRequired { fields }) => {
                assert_eq!(fields, vec!["server.port"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
