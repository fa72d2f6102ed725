//! # Configuration Schemas
//!
//! Reusable records for the components a service typically configures. Each
//! type pairs a serde struct with the declaration table the loader walks.
//!
//! Services compose them into their own top-level type:
//!
//! ```rust
//! use configo::field::{ConfigSchema, FieldSpec};
//! use configo::schema::{App, Database};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Settings {
//!     app: App,
//!     database: Database
//! }
//!
//! impl ConfigSchema for Settings {
//!     fn fields() -> Vec<FieldSpec> {
//!         vec![
//!             FieldSpec::nested("app", App::fields),
//!             FieldSpec::nested("database", Database::fields),
//!         ]
//!     }
//! }
//! ```

pub mod app;
pub mod cache;
pub mod database;
pub mod grpc;
pub mod kafka;
pub mod logger;
pub mod monitoring;
pub mod rest;
pub mod service;
pub mod storage;
pub mod ws;

pub use app::App;
pub use cache::Redis;
pub use database::Database;
pub use grpc::{Grpc, GrpcClient, GrpcServer};
pub use kafka::{KafkaConsumer, KafkaProducer, KafkaTopics};
pub use logger::Logger;
pub use monitoring::Sentry;
pub use rest::{
    Rest, RestCompression, RestCors, RestProfiling, RestRateLimit, RestSecurityHeaders,
    RestStaticFiles, RestTls,
};
pub use service::Service;
pub use storage::S3;
pub use ws::{Ws, WsSession};

use validator::ValidationError;

pub(crate) fn validate_log_level(value: &str) -> Result<(), ValidationError> {
    match value {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new("Invalid logging level")),
    }
}

pub(crate) fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::new("URL must start with http:// or https://"))
    }
}
