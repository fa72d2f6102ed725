//! # Field Declarations
//!
//! Every schema type carries an explicit declaration table next to its struct.
//! The loader walks the table, never the struct, so the external key, env
//! binding, default and required marker of a field all live in one place.
//!
//! ```rust
//! use configo::field::{ConfigSchema, FieldSpec};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Worker {
//!     name: String,
//!     pool_size: u32
//! }
//!
//! impl ConfigSchema for Worker {
//!     fn fields() -> Vec<FieldSpec> {
//!         vec![
//!             FieldSpec::string("name").env("WORKER_NAME").required(),
//!             FieldSpec::integer("poolSize").env("WORKER_POOL_SIZE").default("4"),
//!         ]
//!     }
//! }
//! ```

use serde::de::DeserializeOwned;

/// Separator used for list fields sourced from a single env string.
pub const DEFAULT_SEPARATOR: char = ',';

/// Semantic type of a leaf value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Bool,
    Duration,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::Duration => "duration",
        }
    }
}

/// Shape of a declared field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Scalar(ValueKind),
    List(ValueKind),
    Nested(fn() -> Vec<FieldSpec>),
    NestedList(fn() -> Vec<FieldSpec>),
}

impl FieldKind {
    pub fn describe(&self) -> String {
        match self {
            FieldKind::Scalar(kind) => kind.name().to_string(),
            FieldKind::List(kind) => format!("list<{}>", kind.name()),
            FieldKind::Nested(_) => "record".to_string(),
            FieldKind::NestedList(_) => "list<record>".to_string(),
        }
    }
}

/// One row of a schema's declaration table.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Key in the config file
    pub key: &'static str,

    pub kind: FieldKind,

    /// Environment variable overriding the file value
    pub env: Option<&'static str>,

    /// Default applied when no source supplied a value
    pub default: Option<&'static str>,

    /// Load fails when the field is blank after all sources are merged
    pub required: bool,

    pub separator: char,

    /// Masked in logs and printed output
    pub secret: bool,
}

impl FieldSpec {
    pub fn new(key: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            kind,
            env: None,
            default: None,
            required: false,
            separator: DEFAULT_SEPARATOR,
            secret: false,
        }
    }

    pub fn string(key: &'static str) -> Self {
        Self::new(key, FieldKind::Scalar(ValueKind::String))
    }

    pub fn integer(key: &'static str) -> Self {
        Self::new(key, FieldKind::Scalar(ValueKind::Integer))
    }

    pub fn float(key: &'static str) -> Self {
        Self::new(key, FieldKind::Scalar(ValueKind::Float))
    }

    pub fn boolean(key: &'static str) -> Self {
        Self::new(key, FieldKind::Scalar(ValueKind::Bool))
    }

    pub fn duration(key: &'static str) -> Self {
        Self::new(key, FieldKind::Scalar(ValueKind::Duration))
    }

    pub fn list(key: &'static str, element: ValueKind) -> Self {
        Self::new(key, FieldKind::List(element))
    }

    pub fn nested(key: &'static str, fields: fn() -> Vec<FieldSpec>) -> Self {
        Self::new(key, FieldKind::Nested(fields))
    }

    pub fn nested_list(key: &'static str, fields: fn() -> Vec<FieldSpec>) -> Self {
        Self::new(key, FieldKind::NestedList(fields))
    }

    #[must_use]
    pub fn env(mut self, name: &'static str) -> Self {
        self.env = Some(name);
        self
    }

    #[must_use]
    pub fn default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    #[must_use]
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }
}

/// A configuration record the loader can populate.
///
/// `fields()` must list every key the serde representation reads, using the
/// same external names.
pub trait ConfigSchema: DeserializeOwned {
    fn fields() -> Vec<FieldSpec>;
}
