//! # Deployment Environment
//!
//! Closed set of environment names a service can run under. A value is
//! validated once, at construction; an `Env` in hand is always one of
//! `local`, `dev` or `prod`.

use configo_errors::EnvError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString, IntoStaticStr};

/// Deployment environment.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Tags the running process with the environment it was started for, so
/// consumers can branch on `is_prod()` and friends instead of comparing
/// strings.
///
/// ## Usage
/// ```rust
/// use configo::Env;
///
/// let env = Env::new("dev").unwrap();
/// assert!(env.is_dev());
/// assert!(env.not_prod());
/// assert!(Env::new("staging").is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
#[strum(serialize_all = "lowercase")]
pub enum Env {
    Local,
    Dev,
    Prod,
}

impl Env {
    /// Validate `value` and return the matching environment.
    pub fn new(value: &str) -> Result<Self, EnvError> {
        Self::from_str(value).map_err(|_| EnvError::Invalid {
            value: value.to_string(),
        })
    }

    /// Like [`Env::new`], for startup paths where an unknown name is fatal.
    ///
    /// # Panics
    /// Panics when `value` is not `local`, `dev` or `prod`.
    pub fn must_new(value: &str) -> Self {
        match Self::new(value) {
            Ok(env) => env,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub fn is_local(&self) -> bool {
        *self == Env::Local
    }

    pub fn is_dev(&self) -> bool {
        *self == Env::Dev
    }

    pub fn is_prod(&self) -> bool {
        *self == Env::Prod
    }

    pub fn not_local(&self) -> bool {
        !self.is_local()
    }

    pub fn not_dev(&self) -> bool {
        !self.is_dev()
    }

    pub fn not_prod(&self) -> bool {
        !self.is_prod()
    }
}

impl TryFrom<String> for Env {
    type Error = EnvError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}
