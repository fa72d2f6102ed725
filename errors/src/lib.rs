//! # Configuration Errors
//!
//! Error types shared by the `configo` library and the `configo` binary.
//!
//! - Uses `thiserror` for structured error definitions
//! - Named fields everywhere so messages stay greppable

use thiserror::Error;

/// Errors raised while resolving, reading, merging or decoding a
/// configuration source.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config path not set: pass --config or set {env_var}")]
    PathNotSet { env_var: String },

    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Config file has no extension: {path}")]
    NoExtension { path: String },

    #[error("Unsupported config file format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Failed to parse {format} config {path}: {reason}")]
    Parse {
        path: String,
        format: String,
        reason: String,
    },

    #[error("Invalid value for {field} from {source_name}: {reason}")]
    InvalidValue {
        field: String,
        source_name: String,
        reason: String,
    },

    #[error("Missing required config fields: {}", .fields.join(", "))]
    MissingRequired { fields: Vec<String> },

    #[error("Failed to load config: {reason}")]
    Decode { reason: String },

    #[error("Failed to render config: {reason}")]
    Render { reason: String },
}

/// Deployment environment name errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    #[error("Invalid environment name: {value}")]
    Invalid { value: String },
}

/// Duration string errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("Empty duration")]
    Empty,

    #[error("Invalid duration {input}: {reason}")]
    Invalid { input: String, reason: String },

    #[error("Missing unit in duration {input}")]
    MissingUnit { input: String },

    #[error("Unknown unit {unit} in duration {input}")]
    UnknownUnit { input: String, unit: String },

    #[error("Negative duration {input}")]
    Negative { input: String },

    #[error("Duration overflow: {input}")]
    Overflow { input: String },
}
