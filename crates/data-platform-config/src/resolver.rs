// crates/data-platform-config/src/resolver.rs
// ============================================================================
// Module: Config Resolver
// Description: Merge the partner variables file with environment overrides.
// Purpose: Produce the ConfigMap consumed by the acceptance suite.
// Dependencies: tracing
// ============================================================================

//! ## Overview
//! [`ConfigResolver`] loads the partner variables file and then overlays every
//! [`RecognizedKey`] whose environment variable is set. A variable set to the
//! empty string still counts as set and replaces the file value; validation
//! later reports it as missing. Environment access goes through [`EnvSource`]
//! so tests can resolve against an in-memory environment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::keys::RecognizedKey;
use crate::map::ConfigMap;
use crate::map::load_file;

// ============================================================================
// SECTION: Environment Sources
// ============================================================================

/// Read-only view of environment variables.
pub trait EnvSource {
    /// Returns the value of `name`, or `None` when it is unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|raw| raw.to_string_lossy().into_owned())
    }
}

/// In-memory environment, mainly for tests and embedding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    /// Variables considered set.
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    /// Creates an environment with no variables set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable, replacing any previous value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Merges file-sourced configuration with environment overrides.
#[derive(Debug, Clone, Copy)]
pub struct ConfigResolver<E> {
    /// Environment consulted for recognized keys.
    env: E,
}

impl ConfigResolver<ProcessEnv> {
    /// Creates a resolver over the process environment.
    #[must_use]
    pub const fn from_process_env() -> Self {
        Self {
            env: ProcessEnv,
        }
    }
}

impl<E: EnvSource> ConfigResolver<E> {
    /// Creates a resolver over the given environment.
    pub const fn new(env: E) -> Self {
        Self {
            env,
        }
    }

    /// Loads `path` and overlays recognized environment variables.
    #[must_use]
    pub fn resolve(&self, path: impl AsRef<Path>) -> ConfigMap {
        let mut map = load_file(path);
        for key in RecognizedKey::ALL {
            if let Some(value) = self.env.var(key.as_str()) {
                debug!(key = key.as_str(), "environment overrides partner variable");
                map.insert(key.as_str(), value);
            }
        }
        map
    }
}

/// Resolves `path` against the process environment.
#[must_use]
pub fn resolve(path: impl AsRef<Path>) -> ConfigMap {
    ConfigResolver::from_process_env().resolve(path)
}
