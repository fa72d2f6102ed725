//! Kafka producer, consumer and topic administration settings.

use crate::field::{ConfigSchema, FieldSpec, ValueKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::{Validate, ValidationError};

/// Kafka producer settings.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Broker list plus write batching and acknowledgement policy.
///
/// ## Fields
/// - `brokers`: Bootstrap brokers, comma separated in env (required)
/// - `required_acks`: 0 = none, 1 = leader, -1 = all replicas (default: 1)
/// - `is_async`: Fire-and-forget writes, written as `async` (default: false)
/// - `batch_size` / `batch_timeout`: Batching limits (default: 100, 1s)
/// - `write_timeout`: Per-write timeout (default: 10s)
/// - `max_attempts`: Delivery attempts (default: 3)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KafkaProducer {
    #[validate(length(min = 1))]
    pub brokers: Vec<String>,

    #[validate(range(min = -1, max = 1))]
    pub required_acks: i16,

    #[serde(rename = "async")]
    pub is_async: bool,

    #[validate(range(min = 1))]
    pub batch_size: u32,

    #[serde(with = "crate::duration")]
    pub batch_timeout: Duration,

    #[serde(with = "crate::duration")]
    pub write_timeout: Duration,

    pub max_attempts: u32,
}

impl ConfigSchema for KafkaProducer {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::list("brokers", ValueKind::String)
                .env("KAFKA_PRODUCER_BROKERS")
                .required(),
            FieldSpec::integer("requiredAcks")
                .env("KAFKA_PRODUCER_REQUIRED_ACKS")
                .default("1"),
            FieldSpec::boolean("async").env("KAFKA_PRODUCER_ASYNC").default("false"),
            FieldSpec::integer("batchSize")
                .env("KAFKA_PRODUCER_BATCH_SIZE")
                .default("100"),
            FieldSpec::duration("batchTimeout")
                .env("KAFKA_PRODUCER_BATCH_TIMEOUT")
                .default("1s"),
            FieldSpec::duration("writeTimeout")
                .env("KAFKA_PRODUCER_WRITE_TIMEOUT")
                .default("10s"),
            FieldSpec::integer("maxAttempts")
                .env("KAFKA_PRODUCER_MAX_ATTEMPTS")
                .default("3"),
        ]
    }
}

/// Kafka consumer group settings.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Group membership, fetch sizing, commit cadence and network timeouts for
/// a consumer. `brokers`, `group_id` and `topics` are required; the rest
/// have defaults.
///
/// ## Fields
/// - `start_offset`: Where a new group starts, `latest` or `earliest`
/// - `min_bytes` / `max_bytes` / `max_wait`: Fetch batching (10KB, 10MB, 1s)
/// - `commit_interval`: Auto-commit period, zero disables it (default: 1s)
/// - `heartbeat_interval` / `session_timeout` / `rebalance_timeout`: Group
///   liveness (3s, 30s, 60s)
/// - `dial_timeout` / `read_timeout` / `write_timeout`: Network (3s, 30s, 10s)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KafkaConsumer {
    #[validate(length(min = 1))]
    pub brokers: Vec<String>,

    pub group_id: String,

    #[validate(length(min = 1))]
    pub topics: Vec<String>,

    #[validate(custom(function = "validate_start_offset"))]
    pub start_offset: String,

    pub min_bytes: u32,

    pub max_bytes: u32,

    #[serde(with = "crate::duration")]
    pub max_wait: Duration,

    #[serde(with = "crate::duration")]
    pub commit_interval: Duration,

    #[serde(with = "crate::duration")]
    pub heartbeat_interval: Duration,

    #[serde(with = "crate::duration")]
    pub session_timeout: Duration,

    #[serde(with = "crate::duration")]
    pub rebalance_timeout: Duration,

    #[serde(with = "crate::duration")]
    pub dial_timeout: Duration,

    #[serde(with = "crate::duration")]
    pub read_timeout: Duration,

    #[serde(with = "crate::duration")]
    pub write_timeout: Duration,

    pub max_attempts: u32,
}

fn validate_start_offset(value: &str) -> Result<(), ValidationError> {
    match value {
        "latest" | "earliest" => Ok(()),
        _ => Err(ValidationError::new("startOffset must be latest or earliest")),
    }
}

impl ConfigSchema for KafkaConsumer {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::list("brokers", ValueKind::String)
                .env("KAFKA_CONSUMER_BROKERS")
                .required(),
            FieldSpec::string("groupId").env("KAFKA_CONSUMER_GROUP_ID").required(),
            FieldSpec::list("topics", ValueKind::String)
                .env("KAFKA_CONSUMER_TOPICS")
                .required(),
            FieldSpec::string("startOffset")
                .env("KAFKA_CONSUMER_START_OFFSET")
                .default("latest"),
            FieldSpec::integer("minBytes")
                .env("KAFKA_CONSUMER_MIN_BYTES")
                .default("10000"),
            FieldSpec::integer("maxBytes")
                .env("KAFKA_CONSUMER_MAX_BYTES")
                .default("10000000"),
            FieldSpec::duration("maxWait").env("KAFKA_CONSUMER_MAX_WAIT").default("1s"),
            FieldSpec::duration("commitInterval")
                .env("KAFKA_CONSUMER_COMMIT_INTERVAL")
                .default("1s"),
            FieldSpec::duration("heartbeatInterval")
                .env("KAFKA_CONSUMER_HEARTBEAT_INTERVAL")
                .default("3s"),
            FieldSpec::duration("sessionTimeout")
                .env("KAFKA_CONSUMER_SESSION_TIMEOUT")
                .default("30s"),
            FieldSpec::duration("rebalanceTimeout")
                .env("KAFKA_CONSUMER_REBALANCE_TIMEOUT")
                .default("60s"),
            FieldSpec::duration("dialTimeout")
                .env("KAFKA_CONSUMER_DIAL_TIMEOUT")
                .default("3s"),
            FieldSpec::duration("readTimeout")
                .env("KAFKA_CONSUMER_READ_TIMEOUT")
                .default("30s"),
            FieldSpec::duration("writeTimeout")
                .env("KAFKA_CONSUMER_WRITE_TIMEOUT")
                .default("10s"),
            FieldSpec::integer("maxAttempts")
                .env("KAFKA_CONSUMER_MAX_ATTEMPTS")
                .default("3"),
        ]
    }
}

/// Topics to create at startup, all sharing one partition and replication
/// layout.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KafkaTopics {
    #[validate(length(min = 1))]
    pub list: Vec<String>,

    #[validate(range(min = 1))]
    pub num_partitions: i32,

    #[validate(range(min = 1))]
    pub replication_factor: i16,
}

impl ConfigSchema for KafkaTopics {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::list("list", ValueKind::String)
                .env("KAFKA_TOPICS_LIST")
                .required(),
            FieldSpec::integer("numPartitions")
                .env("KAFKA_TOPICS_NUM_PARTITIONS")
                .required(),
            FieldSpec::integer("replicationFactor")
                .env("KAFKA_TOPICS_REPLICATION_FACTOR")
                .required(),
        ]
    }
}
