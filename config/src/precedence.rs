//! # Configuration Precedence
//!
//! Merges the parsed file with environment overrides and declared defaults,
//! then checks required fields.
//!
//! # Precedence Order
//! 1. Environment variables (highest priority)
//! 2. Configuration file
//! 3. Declared defaults (lowest priority)
//!
//! Required fields are checked once, after all three are merged.

use crate::duration::parse_duration;
use crate::field::{FieldKind, FieldSpec, ValueKind};
use crate::source::{EnvSource, non_empty_var};
use configo_errors::ConfigError;
use serde_yaml::{Mapping, Value};

const FILE_SOURCE: &str = "file";
const DEFAULT_SOURCE: &str = "default";
const MASK: &str = "***";

/// What the merge did, for logging.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Resolution {
    /// `path = value` entries set from environment variables
    pub env_overrides: Vec<String>,

    /// `path = value` entries filled from declared defaults
    pub defaults: Vec<String>,

    missing: Vec<String>,
}

/// Merge env overrides and defaults into `doc` and enforce required fields.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Walks the declaration table of a schema over the parsed document. For
/// every leaf field: a set env variable replaces the file value; a still
/// absent value receives the declared default; a required field that is
/// still blank is recorded. Nested records are walked recursively, and every
/// element of a list of records gets its defaults and required checks (but no
/// env overrides, since elements have no unique variable names). Absent list
/// fields without a default become empty lists.
///
/// ## Error Handling
/// - `ConfigError::InvalidValue`: an env value, file value or default does
///   not convert to the field's kind
/// - `ConfigError::MissingRequired`: lists every blank required field path
pub fn resolve(
    doc: &mut Mapping,
    fields: &[FieldSpec],
    env: &dyn EnvSource,
) -> Result<Resolution, ConfigError> {
    let mut resolution = Resolution::default();
    resolve_record(doc, fields, "", true, env, &mut resolution)?;

    if !resolution.env_overrides.is_empty() {
        tracing::info!("Configuration from env: {:?}", resolution.env_overrides);
    }
    if !resolution.defaults.is_empty() {
        tracing::debug!("Configuration from defaults: {:?}", resolution.defaults);
    }

    if !resolution.missing.is_empty() {
        return Err(ConfigError::MissingRequired {
            fields: std::mem::take(&mut resolution.missing),
        });
    }

    Ok(resolution)
}

fn resolve_record(
    doc: &mut Mapping,
    fields: &[FieldSpec],
    prefix: &str,
    allow_env: bool,
    env: &dyn EnvSource,
    resolution: &mut Resolution,
) -> Result<(), ConfigError> {
    for field in fields {
        let path = join_path(prefix, field.key);

        match field.kind {
            FieldKind::Nested(table) => {
                let slot = doc
                    .entry(Value::from(field.key))
                    .or_insert(Value::Null);
                if slot.is_null() {
                    *slot = Value::Mapping(Mapping::new());
                }
                // Anything but a mapping is left for the decoder to reject.
                if let Value::Mapping(inner) = slot {
                    resolve_record(inner, &table(), &path, allow_env, env, resolution)?;
                }
            }
            FieldKind::NestedList(table) => {
                let slot = doc
                    .entry(Value::from(field.key))
                    .or_insert(Value::Null);
                if slot.is_null() {
                    *slot = Value::Sequence(Vec::new());
                }
                if let Value::Sequence(items) = slot {
                    let table = table();
                    for (index, item) in items.iter_mut().enumerate() {
                        if let Value::Mapping(inner) = item {
                            let item_path = format!("{}[{}]", path, index);
                            resolve_record(inner, &table, &item_path, false, env, resolution)?;
                        }
                    }
                }
                if field.required && is_blank(slot, &field.kind) {
                    resolution.missing.push(path);
                }
            }
            FieldKind::Scalar(_) | FieldKind::List(_) => {
                resolve_leaf(doc, field, path, allow_env, env, resolution)?;
            }
        }
    }

    Ok(())
}

fn resolve_leaf(
    doc: &mut Mapping,
    field: &FieldSpec,
    path: String,
    allow_env: bool,
    env: &dyn EnvSource,
    resolution: &mut Resolution,
) -> Result<(), ConfigError> {
    let key = Value::from(field.key);

    let from_env = match field.env.filter(|_| allow_env) {
        Some(var) => non_empty_var(env, var).map(|raw| (var, raw)),
        None => None,
    };

    if let Some((var, raw)) = from_env {
        let value = convert(&raw, field).map_err(|reason| ConfigError::InvalidValue {
            field: path.clone(),
            source_name: var.to_string(),
            reason,
        })?;
        resolution.env_overrides.push(describe(&path, &raw, field));
        doc.insert(key.clone(), value);
    } else if let Some(existing) = doc.get_mut(&key).filter(|v| !v.is_null()) {
        normalize_file_value(existing, field).map_err(|reason| ConfigError::InvalidValue {
            field: path.clone(),
            source_name: FILE_SOURCE.to_string(),
            reason,
        })?;
    } else if let Some(default) = field.default {
        let value = convert(default, field).map_err(|reason| ConfigError::InvalidValue {
            field: path.clone(),
            source_name: DEFAULT_SOURCE.to_string(),
            reason,
        })?;
        resolution.defaults.push(describe(&path, default, field));
        doc.insert(key.clone(), value);
    } else if matches!(field.kind, FieldKind::List(_)) {
        doc.insert(key.clone(), Value::Sequence(Vec::new()));
    }

    if field.required && doc.get(&key).is_none_or(|value| is_blank(value, &field.kind)) {
        resolution.missing.push(path);
    }

    Ok(())
}

/// Convert a raw string (env value or declared default) to the field's kind.
fn convert(raw: &str, field: &FieldSpec) -> Result<Value, String> {
    match field.kind {
        FieldKind::Scalar(kind) => convert_scalar(raw, kind),
        FieldKind::List(kind) => split_list(raw, field.separator)
            .into_iter()
            .map(|token| convert_scalar(token, kind))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Sequence),
        FieldKind::Nested(_) | FieldKind::NestedList(_) => {
            Err("records cannot be set from a single string".to_string())
        }
    }
}

/// Split on `separator`, keeping trimmed non-empty tokens in order.
pub fn split_list(raw: &str, separator: char) -> Vec<&str> {
    raw.split(separator)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

fn convert_scalar(raw: &str, kind: ValueKind) -> Result<Value, String> {
    match kind {
        ValueKind::String => Ok(Value::from(raw)),
        ValueKind::Integer => {
            let trimmed = raw.trim();
            if let Ok(value) = trimmed.parse::<i64>() {
                Ok(Value::from(value))
            } else {
                trimmed
                    .parse::<u64>()
                    .map(Value::from)
                    .map_err(|_| format!("expected an integer, got {:?}", raw))
            }
        }
        ValueKind::Float => raw
            .trim()
            .parse::<f64>()
            .map(Value::from)
            .map_err(|_| format!("expected a number, got {:?}", raw)),
        ValueKind::Bool => parse_bool(raw.trim())
            .map(Value::from)
            .ok_or_else(|| format!("expected true or false, got {:?}", raw)),
        ValueKind::Duration => {
            let trimmed = raw.trim();
            parse_duration(trimmed)
                .map(|_| Value::from(trimmed))
                .map_err(|e| e.to_string())
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Bring a file-supplied value in line with the field's kind.
///
/// Quoted scalars (`port: "8080"`) are converted like env strings, bare
/// numbers and booleans in string fields become strings, and a list field
/// written as one string is split on the separator.
fn normalize_file_value(value: &mut Value, field: &FieldSpec) -> Result<(), String> {
    match field.kind {
        FieldKind::Scalar(kind) => normalize_scalar(value, kind),
        FieldKind::List(kind) => {
            if let Value::String(raw) = value {
                *value = convert(raw, field)?;
                return Ok(());
            }
            if let Value::Sequence(items) = value {
                for item in items.iter_mut() {
                    normalize_scalar(item, kind)?;
                }
            }
            Ok(())
        }
        FieldKind::Nested(_) | FieldKind::NestedList(_) => Ok(()),
    }
}

fn normalize_scalar(value: &mut Value, kind: ValueKind) -> Result<(), String> {
    let replacement = match (kind, &*value) {
        (ValueKind::String, Value::Number(n)) if n.is_f64() => {
            return Err(format!(
                "expected a string, got the number {}; quote the value to keep it as written",
                n,
            ));
        }
        (ValueKind::String, Value::Number(n)) => Some(Value::from(n.to_string())),
        (ValueKind::String, Value::Bool(b)) => Some(Value::from(b.to_string())),
        (ValueKind::String, _) => None,
        (_, Value::String(raw)) => Some(convert_scalar(raw, kind)?),
        _ => None,
    };
    if let Some(replacement) = replacement {
        *value = replacement;
    }
    Ok(())
}

/// Absent, null, `""`, an empty list, or zero for a numeric or duration
/// field. `false` counts as a value.
fn is_blank(value: &Value, kind: &FieldKind) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) if s.is_empty() => true,
        Value::Sequence(items) => items.is_empty(),
        _ => {
            matches!(
                kind,
                FieldKind::Scalar(ValueKind::Integer | ValueKind::Float | ValueKind::Duration),
            ) && is_zero(value)
        }
    }
}

fn is_zero(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(raw) => parse_duration(raw).is_ok_and(|d| d.is_zero()),
        _ => false,
    }
}

fn describe(path: &str, raw: &str, field: &FieldSpec) -> String {
    if field.secret {
        format!("{} = {}", path, MASK)
    } else {
        format!("{} = {}", path, raw)
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Replace every secret leaf in `doc` with `***`.
pub fn mask_secrets(doc: &mut Mapping, fields: &[FieldSpec]) {
    for field in fields {
        let Some(slot) = doc.get_mut(field.key) else {
            continue;
        };

        match field.kind {
            FieldKind::Nested(table) => {
                if let Value::Mapping(inner) = slot {
                    mask_secrets(inner, &table());
                }
            }
            FieldKind::NestedList(table) => {
                if let Value::Sequence(items) = slot {
                    let table = table();
                    for item in items.iter_mut() {
                        if let Value::Mapping(inner) = item {
                            mask_secrets(inner, &table);
                        }
                    }
                }
            }
            FieldKind::Scalar(_) | FieldKind::List(_) => {
                if field.secret && !is_blank(slot, &field.kind) {
                    *slot = Value::from(MASK);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sub_fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::boolean("enabled").env("T_SUB_ENABLED").default("false"),
            FieldSpec::list("origins", ValueKind::String)
                .env("T_SUB_ORIGINS")
                .default(""),
        ]
    }

    fn item_fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::string("host").env("T_ITEM_HOST").required(),
            FieldSpec::duration("ttl").default("1h"),
        ]
    }

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::string("name").env("T_NAME").required(),
            FieldSpec::integer("port").env("T_PORT").default("8080"),
            FieldSpec::string("password").env("T_PASSWORD").secret(),
            FieldSpec::list("brokers", ValueKind::String)
                .env("T_BROKERS")
                .required(),
            FieldSpec::duration("timeout").env("T_TIMEOUT").default("10s"),
            FieldSpec::nested("sub", sub_fields),
            FieldSpec::nested_list("items", item_fields),
        ]
    }

    fn doc(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_fill_absent_fields() {
        let mut doc = doc("name: svc\nbrokers: [a]\n");
        let resolution = resolve(&mut doc, &fields(), &env(&[])).unwrap();

        assert_eq!(doc.get("port").and_then(Value::as_i64), Some(8080));
        assert_eq!(doc.get("timeout").and_then(Value::as_str), Some("10s"));
        let sub = doc.get("sub").and_then(Value::as_mapping).unwrap();
        assert_eq!(sub.get("enabled").and_then(Value::as_bool), Some(false));
        assert_eq!(
            sub.get("origins").and_then(Value::as_sequence).map(Vec::len),
            Some(0),
        );
        assert!(resolution.defaults.iter().any(|d| d == "port = 8080"));
        assert!(resolution.env_overrides.is_empty());
    }

    #[test]
    fn test_file_value_beats_default() {
        let mut doc = doc("name: svc\nbrokers: [a]\nport: 9000\n");
        resolve(&mut doc, &fields(), &env(&[])).unwrap();
        assert_eq!(doc.get("port").and_then(Value::as_i64), Some(9000));
    }

    #[test]
    fn test_env_beats_file() {
        let mut doc = doc("name: from-file\nbrokers: [a]\n");
        let resolution = resolve(&mut doc, &fields(), &env(&[("T_NAME", "from-env")])).unwrap();
        assert_eq!(doc.get("name").and_then(Value::as_str), Some("from-env"));
        assert_eq!(resolution.env_overrides, vec!["name = from-env".to_string()]);
    }

    #[test]
    fn test_env_list_split_on_separator() {
        let mut doc = doc("name: svc\n");
        resolve(&mut doc, &fields(), &env(&[("T_BROKERS", "a, b,,c")])).unwrap();
        let brokers: Vec<&str> = doc
            .get("brokers")
            .and_then(Value::as_sequence)
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(brokers, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_custom_separator() {
        let field = FieldSpec::list("hosts", ValueKind::String).separator(';');
        assert_eq!(
            convert("x;y", &field).unwrap(),
            Value::Sequence(vec![Value::from("x"), Value::from("y")]),
        );
    }

    #[test]
    fn test_nested_env_override() {
        let mut doc = doc("name: svc\nbrokers: [a]\nsub:\n  enabled: false\n");
        resolve(&mut doc, &fields(), &env(&[("T_SUB_ENABLED", "true")])).unwrap();
        let sub = doc.get("sub").and_then(Value::as_mapping).unwrap();
        assert_eq!(sub.get("enabled").and_then(Value::as_bool), Some(true));
    }

    #[test]
    fn test_missing_required_collects_all_paths() {
        let mut doc = doc("items:\n  - ttl: 5m\n");
        let err = resolve(&mut doc, &fields(), &env(&[])).unwrap_err();
        match err {
            ConfigError::MissingRequired { fields } => {
                assert_eq!(fields, vec!["name", "brokers", "items[0].host"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_string_is_blank_for_required() {
        let mut doc = doc("name: \"\"\nbrokers: [a]\n");
        assert!(matches!(
            resolve(&mut doc, &fields(), &env(&[])),
            Err(ConfigError::MissingRequired { .. }),
        ));
    }

    #[test]
    fn test_env_satisfies_required() {
        let mut doc = Mapping::new();
        resolve(
            &mut doc,
            &fields(),
            &env(&[("T_NAME", "svc"), ("T_BROKERS", "k1:9092")]),
        )
        .unwrap();
        assert_eq!(doc.get("name").and_then(Value::as_str), Some("svc"));
    }

    #[test]
    fn test_empty_env_value_is_ignored() {
        let mut doc = doc("name: from-file\nbrokers: [a]\n");
        resolve(&mut doc, &fields(), &env(&[("T_NAME", "")])).unwrap();
        assert_eq!(doc.get("name").and_then(Value::as_str), Some("from-file"));
    }

    #[test]
    fn test_list_items_get_defaults_but_no_env() {
        let mut doc = doc("name: svc\nbrokers: [a]\nitems:\n  - host: a\n  - host: b\n    ttl: 5m\n");
        resolve(&mut doc, &fields(), &env(&[("T_ITEM_HOST", "ignored")])).unwrap();
        let items = doc.get("items").and_then(Value::as_sequence).unwrap();
        assert_eq!(items[0].get("host").and_then(Value::as_str), Some("a"));
        assert_eq!(items[0].get("ttl").and_then(Value::as_str), Some("1h"));
        assert_eq!(items[1].get("ttl").and_then(Value::as_str), Some("5m"));
    }

    #[test]
    fn test_invalid_env_value_names_variable() {
        let mut doc = doc("name: svc\nbrokers: [a]\n");
        let err = resolve(&mut doc, &fields(), &env(&[("T_PORT", "eighty")])).unwrap_err();
        match err {
            ConfigError::InvalidValue {
                field, source_name, ..
            } => {
                assert_eq!(field, "port");
                assert_eq!(source_name, "T_PORT");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_file_duration() {
        let mut doc = doc("name: svc\nbrokers: [a]\ntimeout: soon\n");
        let err = resolve(&mut doc, &fields(), &env(&[])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref source_name, .. } if source_name == "file",
        ));
    }

    #[test]
    fn test_file_scalars_normalized() {
        let mut doc = doc("name: 42\nbrokers: \"a,b\"\nport: \"9000\"\n");
        resolve(&mut doc, &fields(), &env(&[])).unwrap();
        assert_eq!(doc.get("name").and_then(Value::as_str), Some("42"));
        assert_eq!(doc.get("port").and_then(Value::as_i64), Some(9000));
        assert_eq!(
            doc.get("brokers").and_then(Value::as_sequence).map(Vec::len),
            Some(2),
        );
    }

    #[test]
    fn test_fractional_number_in_string_field_rejected() {
        let mut doc = doc("name: 1.10\nbrokers: [a]\n");
        match resolve(&mut doc, &fields(), &env(&[])).unwrap_err() {
            ConfigError::InvalidValue {
                field, source_name, reason,
            } => {
                assert_eq!(field, "name");
                assert_eq!(source_name, "file");
                assert!(reason.contains("quote"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_quoted_number_in_string_field_kept_as_written() {
        let mut doc = doc("name: \"1.10\"\nbrokers: [a]\n");
        resolve(&mut doc, &fields(), &env(&[])).unwrap();
        assert_eq!(doc.get("name").and_then(Value::as_str), Some("1.10"));
    }

    #[test]
    fn test_zero_is_blank_for_required_numbers() {
        let numeric = || {
            vec![
                FieldSpec::integer("port").required(),
                FieldSpec::float("ratio").required(),
                FieldSpec::duration("timeout").required(),
                FieldSpec::boolean("enabled").required(),
            ]
        };
        let mut zeros = doc("port: 0\nratio: 0.0\ntimeout: 0s\nenabled: false\n");
        match resolve(&mut zeros, &numeric(), &env(&[])).unwrap_err() {
            ConfigError::MissingRequired { fields } => {
                assert_eq!(fields, vec!["port", "ratio", "timeout"]);
            }
            other => panic!("unexpected error: {other}"),
        }

        let mut values = doc("port: 1\nratio: 0.5\ntimeout: 1s\nenabled: false\n");
        assert!(resolve(&mut values, &numeric(), &env(&[])).is_ok());
    }

    #[test]
    fn test_zero_from_env_is_blank_for_required() {
        let fields = vec![FieldSpec::integer("port").env("T_PORT").required()];
        let mut doc = Mapping::new();
        assert!(matches!(
            resolve(&mut doc, &fields, &env(&[("T_PORT", "0")])),
            Err(ConfigError::MissingRequired { .. }),
        ));
    }

    #[test]
    fn test_secret_masked_in_resolution() {
        let mut doc = doc("name: svc\nbrokers: [a]\n");
        let resolution = resolve(&mut doc, &fields(), &env(&[("T_PASSWORD", "hunter2")])).unwrap();
        assert_eq!(resolution.env_overrides, vec!["password = ***".to_string()]);
        assert_eq!(doc.get("password").and_then(Value::as_str), Some("hunter2"));
    }

    #[test]
    fn test_mask_secrets() {
        let mut doc = doc("name: svc\npassword: hunter2\n");
        mask_secrets(&mut doc, &fields());
        assert_eq!(doc.get("password").and_then(Value::as_str), Some("***"));
        assert_eq!(doc.get("name").and_then(Value::as_str), Some("svc"));
    }

    #[test]
    fn test_parse_bool_forms() {
        for raw in ["1", "t", "T", "true", "TRUE", "True"] {
            assert_eq!(parse_bool(raw), Some(true));
        }
        for raw in ["0", "f", "F", "false", "FALSE", "False"] {
            assert_eq!(parse_bool(raw), Some(false));
        }
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a,b,c", ','), vec!["a", "b", "c"]);
        assert!(split_list("", ',').is_empty());
        assert!(split_list(" , ,", ',').is_empty());
    }
}
