//! # Configuration Loader
//!
//! Generic entry point that turns a config path into a populated schema:
//! resolve the path, check the file exists, parse it, overlay env variables,
//! apply defaults, enforce required fields, decode.

use crate::field::ConfigSchema;
use crate::file_loader::{FileFormat, parse_document, read_document};
use crate::path::resolve_config_path;
use crate::precedence::resolve;
use crate::source::{EnvSource, ProcessEnv};
use configo_errors::ConfigError;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::Path;

/// Loads schemas from files and environment variables.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Holds the environment source used for path fallback and field overrides.
/// `ConfigLoader::new()` reads the process environment; tests pass a map.
///
/// ## Usage
/// ```rust,no_run
/// use configo::{ConfigLoader, schema::Database};
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let db: Database = ConfigLoader::new().load_path(Path::new("config.yaml"))?;
///     println!("Database host: {}", db.host);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader<E = ProcessEnv> {
    env: E,
}

impl ConfigLoader<ProcessEnv> {
    pub fn new() -> Self {
        Self { env: ProcessEnv }
    }
}

impl<E: EnvSource> ConfigLoader<E> {
    pub fn with_env(env: E) -> Self {
        Self { env }
    }

    /// Load `T` from the path given by the process arguments or `CONFIG_PATH`.
    pub fn load<T: ConfigSchema>(&self) -> Result<T, ConfigError> {
        self.load_from_args(std::env::args_os())
    }

    /// Load `T` from the path given by `args` (program name first) or
    /// `CONFIG_PATH`.
    ///
    /// ## Error Handling
    /// - `PathNotSet` when no path is given, before any filesystem access
    /// - `FileNotFound` when the path is not a file, before any parsing
    /// - everything [`ConfigLoader::load_path`] returns
    pub fn load_from_args<T, I, A>(&self, args: I) -> Result<T, ConfigError>
    where
        T: ConfigSchema,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        let path = resolve_config_path(args, &self.env)?;
        self.load_path(&path)
    }

    /// Load `T` from a config file.
    pub fn load_path<T: ConfigSchema>(&self, path: &Path) -> Result<T, ConfigError> {
        tracing::info!("Loading configuration from {}", path.display());
        let doc = read_document(path)?;
        self.finish(doc)
    }

    /// Load `T` from config text already in memory.
    pub fn load_str<T: ConfigSchema>(
        &self,
        contents: &str,
        format: FileFormat,
    ) -> Result<T, ConfigError> {
        let doc = parse_document(contents, format, "<inline>")?;
        self.finish(doc)
    }

    fn finish<T: ConfigSchema>(&self, mut doc: Mapping) -> Result<T, ConfigError> {
        resolve(&mut doc, &T::fields(), &self.env)?;

        serde_yaml::from_value(Value::Mapping(doc)).map_err(|e| ConfigError::Decode {
            reason: format!("{}: {}", short_type_name::<T>(), e),
        })
    }
}

/// Build `T` from its declared defaults alone, ignoring files and env.
///
/// Fails with `MissingRequired` when `T` has required fields.
pub fn from_defaults<T: ConfigSchema>() -> Result<T, ConfigError> {
    ConfigLoader::with_env(HashMap::<String, String>::new()).finish(Mapping::new())
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Load `T` using the process arguments and environment.
pub fn load<T: ConfigSchema>() -> Result<T, ConfigError> {
    ConfigLoader::new().load()
}

/// Load `T` or terminate the process.
///
/// For `main` functions that cannot run without configuration: on any load
/// error the diagnostic goes to the log and stderr, and the process exits
/// with status 1.
pub fn must_load<T: ConfigSchema>() -> T {
    match load::<T>() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            eprintln!("failed to load config: {}", e);
            std::process::exit(1);
        }
    }
}
