//! # Config Path Resolution
//!
//! The config file is named by the `--config` flag, falling back to the
//! `CONFIG_PATH` environment variable. Host applications own the rest of the
//! command line, so only the `--config` pair is picked out of the arguments
//! before `clap` sees them.

use crate::source::{EnvSource, non_empty_var};
use clap::Parser;
use configo_errors::ConfigError;
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable holding the config path when no flag is given.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

const FLAG: &str = "--config";
const SHORT_FLAG: &str = "-config";

#[derive(Debug, Parser)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct PathArgs {
    /// Path to the config file
    #[arg(long = "config", value_name = "PATH", overrides_with = "config")]
    config: Option<PathBuf>,
}

/// Resolve the config path from `args` (program name first) and `env`.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Finds the config file location without touching the filesystem:
/// a non-empty `--config` value wins, then a non-empty `CONFIG_PATH`.
///
/// ## Usage
/// ```rust
/// use configo::path::resolve_config_path;
/// use std::collections::HashMap;
///
/// let env: HashMap<String, String> = HashMap::new();
/// let path = resolve_config_path(["svc", "--config", "app.yaml"], &env).unwrap();
/// assert_eq!(path.to_str(), Some("app.yaml"));
/// ```
///
/// ## Error Handling
/// Returns `ConfigError::PathNotSet` when neither source yields a path.
pub fn resolve_config_path<I, T>(args: I, env: &dyn EnvSource) -> Result<PathBuf, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let from_flag = flag_value(args)?;

    if let Some(path) = from_flag.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path);
    }

    non_empty_var(env, CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .ok_or_else(path_not_set)
}

fn flag_value<I, T>(args: I) -> Result<Option<PathBuf>, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut relevant: Vec<OsString> = Vec::new();
    relevant.push(args.next().unwrap_or_else(|| OsString::from("configo")));

    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str() else {
            continue;
        };

        if text == FLAG || text == SHORT_FLAG {
            match args.next() {
                Some(value) if value.is_empty() => {}
                Some(value) => {
                    relevant.push(OsString::from(FLAG));
                    relevant.push(value);
                }
                None => relevant.push(OsString::from(FLAG)),
            }
        } else if let Some(value) = text
            .strip_prefix("--config=")
            .or_else(|| text.strip_prefix("-config="))
        {
            if !value.is_empty() {
                relevant.push(OsString::from(FLAG));
                relevant.push(OsString::from(value));
            }
        }
    }

    PathArgs::try_parse_from(relevant)
        .map(|parsed| parsed.config)
        .map_err(|e| {
            tracing::warn!("Ignoring malformed --config argument: {}", e.kind());
            path_not_set()
        })
}

fn path_not_set() -> ConfigError {
    ConfigError::PathNotSet {
        env_var: CONFIG_PATH_ENV.to_string(),
    }
}
