//! # Configuration System
//!
//! Typed configuration for services: reusable schemas for common components
//! and a loader that fills any schema from a config file and the environment.
//!
//! This crate provides:
//! - Configuration structures for application identity, logging, databases,
//!   caches, error reporting, object storage, Kafka, REST, gRPC and WebSocket
//!   servers
//! - Configuration file loading (YAML, with JSON and TOML by extension)
//! - Environment variable overrides (12-factor app principles)
//! - Configuration precedence (env > file > defaults)
//! - Required-field checks after all sources are merged
//! - Optional `validator` rules for consumers
//!
//! ```rust,no_run
//! use configo::schema::{App, Logger};
//! use configo::field::{ConfigSchema, FieldSpec};
//! use configo::Env;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Settings {
//!     env: Env,
//!     app: App,
//!     logger: Logger
//! }
//!
//! impl ConfigSchema for Settings {
//!     fn fields() -> Vec<FieldSpec> {
//!         vec![
//!             FieldSpec::string("env").env("ENV").default("local"),
//!             FieldSpec::nested("app", App::fields),
//!             FieldSpec::nested("logger", Logger::fields),
//!         ]
//!     }
//! }
//!
//! let settings: Settings = configo::must_load();
//! println!("{} {}", settings.app.name, settings.env);
//! ```

pub mod duration;
pub mod environment;
pub mod field;
pub mod file_loader;
pub mod loader;
pub mod path;
pub mod precedence;
pub mod render;
pub mod schema;
pub mod source;
pub mod validator;

pub use configo_errors::{ConfigError, DurationError, EnvError};
pub use environment::Env;
pub use field::{ConfigSchema, FieldKind, FieldSpec, ValueKind};
pub use file_loader::FileFormat;
pub use loader::{ConfigLoader, from_defaults, load, must_load};
pub use render::{env_usage, redacted_yaml};
pub use source::{EnvSource, ProcessEnv};
pub use self::validator::{describe_errors, validate};
pub use ::validator::Validate;
