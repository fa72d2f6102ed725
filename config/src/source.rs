//! # Environment Sources
//!
//! Where the loader reads environment variables from. Production code uses
//! the process environment; tests inject a map.

use std::collections::HashMap;

/// Lookup of environment variables by name.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<E: EnvSource + ?Sized> EnvSource for &E {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

/// Read a variable, treating an empty value as unset.
pub(crate) fn non_empty_var(source: &dyn EnvSource, name: &str) -> Option<String> {
    source.var(name).filter(|value| !value.is_empty())
}
