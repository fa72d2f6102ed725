//! # Rendering
//!
//! Text views of a schema: the environment variables it reads, and a loaded
//! value printed as YAML with secrets masked.

use crate::field::{ConfigSchema, DEFAULT_SEPARATOR, FieldKind, FieldSpec};
use crate::precedence::mask_secrets;
use configo_errors::ConfigError;
use serde::Serialize;
use serde_yaml::Value;

struct UsageRow {
    var: &'static str,
    kind: String,
    path: String,
    note: String,
}

/// Describe every environment variable `T` reads.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// One aligned row per env-bound field: variable, kind, file path, then the
/// default or a `required` marker. Elements of lists of records have no env
/// binding and are not listed.
///
/// ## Usage
/// ```rust
/// use configo::render::env_usage;
/// use configo::schema::App;
///
/// let usage = env_usage::<App>();
/// assert!(usage.contains("APP_NAME"));
/// assert!(usage.contains("required"));
/// ```
pub fn env_usage<T: ConfigSchema>() -> String {
    let mut rows = Vec::new();
    collect_rows(&T::fields(), "", &mut rows);

    let var_width = rows.iter().map(|r| r.var.len()).max().unwrap_or(0);
    let kind_width = rows.iter().map(|r| r.kind.len()).max().unwrap_or(0);
    let path_width = rows.iter().map(|r| r.path.len()).max().unwrap_or(0);

    let mut out = String::from("Environment variables:\n");
    for row in &rows {
        let line = format!(
            "  {:<var_width$}  {:<kind_width$}  {:<path_width$}  {}",
            row.var, row.kind, row.path, row.note,
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn collect_rows(fields: &[FieldSpec], prefix: &str, rows: &mut Vec<UsageRow>) {
    for field in fields {
        let path = if prefix.is_empty() {
            field.key.to_string()
        } else {
            format!("{}.{}", prefix, field.key)
        };

        match field.kind {
            FieldKind::Nested(table) => collect_rows(&table(), &path, rows),
            FieldKind::NestedList(_) => {}
            FieldKind::Scalar(_) | FieldKind::List(_) => {
                let Some(var) = field.env else {
                    continue;
                };
                rows.push(UsageRow {
                    var,
                    kind: field.kind.describe(),
                    path,
                    note: note_for(field),
                });
            }
        }
    }
}

fn note_for(field: &FieldSpec) -> String {
    let mut note = match field.default {
        Some(default) => format!("(default {:?})", default),
        None if field.required => "required".to_string(),
        None => String::new(),
    };
    if matches!(field.kind, FieldKind::List(_)) && field.separator != DEFAULT_SEPARATOR {
        note.push_str(&format!(" (separator {:?})", field.separator));
    }
    if field.secret {
        note.push_str(" secret");
    }
    note.trim_start().to_string()
}

/// Serialize a loaded value to YAML with every secret field masked.
pub fn redacted_yaml<T: ConfigSchema + Serialize>(config: &T) -> Result<String, ConfigError> {
    let render_error = |e: serde_yaml::Error| ConfigError::Render {
        reason: e.to_string(),
    };

    let mut value = serde_yaml::to_value(config).map_err(render_error)?;
    if let Value::Mapping(doc) = &mut value {
        mask_secrets(doc, &T::fields());
    }
    serde_yaml::to_string(&value).map_err(render_error)
}
