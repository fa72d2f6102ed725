//! # Configuration Validation
//!
//! Range and enum checks for loaded schemas, using the `validator` crate.
//! Loading never calls these; a consumer decides whether a loaded value is
//! acceptable for its use.

use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Validate a loaded configuration value.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Runs the `validator` rules derived on a schema, including nested
/// sections and list elements.
///
/// ## Usage
/// ```rust
/// use configo::schema::Service;
/// use configo::validator::validate;
///
/// assert!(validate(&Service { port: 8080 }).is_ok());
/// assert!(validate(&Service { port: 0 }).is_err());
/// ```
///
/// ## Validation Rules
/// - Ports: 1-65535
/// - Compression levels: -1 to 9
/// - Log levels: "trace", "debug", "info", "warn" or "error"
/// - Kafka `startOffset`: "latest" or "earliest"; `requiredAcks`: -1 to 1
/// - `frameOptions`: "DENY" or "SAMEORIGIN"
/// - URL paths and prefixes start with `/`
pub fn validate<T: Validate>(config: &T) -> Result<(), ValidationErrors> {
    config.validate()
}

/// Flatten validation errors into sorted `path: code` lines.
///
/// Nested sections produce dotted paths and list elements an index, for
/// example `static_files[1].index_file`.
pub fn describe_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut lines = Vec::new();
    collect(errors, "", &mut lines);
    lines.sort();
    lines
}

fn collect(errors: &ValidationErrors, prefix: &str, lines: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    match &error.message {
                        Some(message) => lines.push(format!("{}: {}", path, message)),
                        None => lines.push(format!("{}: {}", path, error.code)),
                    }
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, lines),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{}[{}]", path, index), lines);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::from_defaults;
    use crate::schema::{Redis, Rest, RestStaticFiles, Service};
    use std::time::Duration;

    #[test]
    fn test_validate_valid_service() {
        assert!(validate(&Service { port: 8080 }).is_ok());
    }

    #[test]
    fn test_validate_invalid_port() {
        assert!(validate(&Service { port: 0 }).is_err());
    }

    #[test]
    fn test_validate_invalid_redis_port() {
        let redis = Redis {
            host: "localhost".to_string(),
            port: 0,
            db: 16,
        };
        let errors = validate(&redis).unwrap_err();
        assert_eq!(describe_errors(&errors), vec!["port: range".to_string()]);
    }

    #[test]
    fn test_nested_paths() {
        let mut rest: Rest = from_defaults().unwrap();
        rest.compression.level = 12;
        rest.cors.max_age = Duration::from_secs(60);

        let lines = describe_errors(&validate(&rest).unwrap_err());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("compression.level"));
    }

    #[test]
    fn test_list_element_paths() {
        let mut rest: Rest = from_defaults().unwrap();
        rest.static_files.push(RestStaticFiles {
            enabled: true,
            url_prefix: Some("/assets/".to_string()),
            fs_root: Some("./public".to_string()),
            cache_ttl: Duration::from_secs(60),
            index_file: String::new(),
            spa: false,
        });

        let lines = describe_errors(&validate(&rest).unwrap_err());
        assert_eq!(lines, vec!["static_files[0].index_file: length".to_string()]);
    }
}
