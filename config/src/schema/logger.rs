use crate::field::{ConfigSchema, FieldSpec};
use crate::schema::validate_log_level;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Log output settings for console and rotating file sinks.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Describes where logs go and how files rotate. Every field has a default,
/// so an empty `logger:` section is valid.
///
/// ## Fields
/// - `dir`: Directory for log files (default: "logs")
/// - `max_size`: Size in megabytes before a file rotates (default: 10)
/// - `max_backups`: Rotated files kept (default: 3)
/// - `max_age`: Days a rotated file is kept (default: 365)
/// - `compress`: Gzip rotated files (default: true)
/// - `rotation_time`: Time-based rotation interval (default: 24h)
/// - `console_level` / `file_level`: Minimum level per sink (default: "debug")
/// - `enable_console` / `enable_file`: Sink switches (default: true)
/// - `time_format`: `strftime` pattern for timestamps
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Logger {
    pub dir: String,

    #[validate(range(min = 1))]
    pub max_size: u32,

    pub max_backups: u32,

    pub max_age: u32,

    pub compress: bool,

    #[serde(with = "crate::duration")]
    pub rotation_time: Duration,

    #[validate(custom(function = "validate_log_level"))]
    pub console_level: String,

    #[validate(custom(function = "validate_log_level"))]
    pub file_level: String,

    pub enable_console: bool,

    pub enable_file: bool,

    pub time_format: String,
}

impl ConfigSchema for Logger {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::string("dir").env("LOGGER_DIR").default("logs"),
            FieldSpec::integer("maxSize").env("LOGGER_MAX_SIZE").default("10"),
            FieldSpec::integer("maxBackups").env("LOGGER_MAX_BACKUPS").default("3"),
            FieldSpec::integer("maxAge").env("LOGGER_MAX_AGE").default("365"),
            FieldSpec::boolean("compress").env("LOGGER_COMPRESS").default("true"),
            FieldSpec::duration("rotationTime").env("LOGGER_ROTATION_TIME").default("24h"),
            FieldSpec::string("consoleLevel").env("LOGGER_CONSOLE_LEVEL").default("debug"),
            FieldSpec::string("fileLevel").env("LOGGER_FILE_LEVEL").default("debug"),
            FieldSpec::boolean("enableConsole").env("LOGGER_ENABLE_CONSOLE").default("true"),
            FieldSpec::boolean("enableFile").env("LOGGER_ENABLE_FILE").default("true"),
            FieldSpec::string("timeFormat")
                .env("LOGGER_TIME_FORMAT")
                .default("%Y-%m-%dT%H:%M:%S%.3f%:z"),
        ]
    }
}
