//! Configuration sources consulted for implementation names.
//!
//! A [`PropertySource`] answers "which implementation is configured under this
//! key?". The registry reads it once per unresolved `get`, using keys of the form
//! `<namespace>.<ExtensionPointName>.implementation`.

use std::collections::HashMap;
use std::env::{self, VarError};
use std::sync::RwLock;

use crate::PluginError;

/// Process-wide key/value configuration.
pub trait PropertySource: Send + Sync {
    /// Returns the value configured under `key`, or `None` if nothing is set.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidConfiguration`] if a value exists but
    /// cannot be read.
    fn property(&self, key: &str) -> Result<Option<String>, PluginError>;
}

/// Reads properties from environment variables.
///
/// The key is upper-cased and every `.` or `-` becomes `_`, so
/// `plugin.ErrorHandler.implementation` is read from
/// `PLUGIN_ERRORHANDLER_IMPLEMENTATION`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvProperties;

impl EnvProperties {
    /// Environment variable name consulted for `key`.
    pub fn var_name(key: &str) -> String {
        key.chars()
            .map(|c| match c {
                '.' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect()
    }
}

impl PropertySource for EnvProperties {
    fn property(&self, key: &str) -> Result<Option<String>, PluginError> {
        let var = Self::var_name(key);
        match env::var(&var) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(PluginError::InvalidConfiguration {
                key: key.to_string(),
                reason: format!("environment variable {} is not valid unicode", var),
            }),
        }
    }
}

/// In-memory properties, settable at runtime.
///
/// Useful for embedding applications that carry their own configuration and for
/// tests that must not touch the process environment.
///
/// # Examples
///
/// ```rust
/// use plugin_registry::{MemoryProperties, PropertySource};
///
/// let props = MemoryProperties::new().with("plugin.ErrorHandler.implementation", "acme::Handler");
/// assert_eq!(
///     props.property("plugin.ErrorHandler.implementation").unwrap().as_deref(),
///     Some("acme::Handler")
/// );
/// ```
#[derive(Debug, Default)]
pub struct MemoryProperties {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key`, returning the previous value.
    ///
    /// Lock poisoning is recovered: the map holds plain strings and every write
    /// is a single insert.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .insert(key.into(), value.into())
    }

    /// Removes `key`, returning the value it held.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.values
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .remove(key)
    }
}

impl PropertySource for MemoryProperties {
    fn property(&self, key: &str) -> Result<Option<String>, PluginError> {
        let values = self.values.read().unwrap_or_else(|p| p.into_inner());
        Ok(values.get(key).cloned())
    }
}
