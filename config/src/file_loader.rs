//! # Configuration File Loading
//!
//! Reads a config file into a generic document tree that the precedence pass
//! then merges with environment overrides and defaults.
//!
//! Supports automatic format detection based on file extension.

use configo_errors::ConfigError;
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
    Toml,
}

impl FileFormat {
    /// Detect the format from the file extension.
    ///
    /// ## Supported Formats
    /// - `.yaml`, `.yml`: YAML
    /// - `.json`: JSON (read with the YAML parser)
    /// - `.toml`: TOML
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::NoExtension {
                path: path.display().to_string(),
            })?;

        match extension.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(FileFormat::Yaml),
            "json" => Ok(FileFormat::Json),
            "toml" => Ok(FileFormat::Toml),
            other => Err(ConfigError::UnsupportedFormat {
                extension: other.to_string(),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FileFormat::Yaml => "YAML",
            FileFormat::Json => "JSON",
            FileFormat::Toml => "TOML",
        }
    }
}

/// Read and parse a config file.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Loads the raw document behind a config path. The file must exist before
/// anything is parsed.
///
/// ## Error Handling
/// Returns `ConfigError` for:
/// - File not found (checked first)
/// - Missing or unsupported extension
/// - Unreadable file
/// - Invalid syntax, or a top level that is not a mapping
pub fn read_document(path: &Path) -> Result<Mapping, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let format = FileFormat::from_path(path)?;

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    parse_document(&contents, format, &path.display().to_string())
}

/// Parse config text in the given format.
///
/// `origin` names the source in error messages. An empty document yields an
/// empty mapping.
pub fn parse_document(
    contents: &str,
    format: FileFormat,
    origin: &str,
) -> Result<Mapping, ConfigError> {
    let parse_error = |reason: String| ConfigError::Parse {
        path: origin.to_string(),
        format: format.name().to_string(),
        reason,
    };

    let value = match format {
        FileFormat::Yaml | FileFormat::Json => {
            serde_yaml::from_str::<Value>(contents).map_err(|e| parse_error(e.to_string()))?
        }
        FileFormat::Toml => {
            let table = toml::from_str::<toml::Table>(contents)
                .map_err(|e| parse_error(e.to_string()))?;
            serde_yaml::to_value(table).map_err(|e| parse_error(e.to_string()))?
        }
    };

    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(parse_error("top-level value must be a mapping".to_string())),
    }
}
