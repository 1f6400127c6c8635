//! Collaborators a registry resolves through.

use std::sync::Arc;

use crate::{EnvProperties, ImplementationLoader, InventoryLoader, PropertySource};

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "plugin";

/// Where a registry looks for a configured implementation and how it loads it.
///
/// The default reads `plugin.<ExtensionPointName>.implementation` from the
/// environment (see [`EnvProperties`]) and loads names from factories
/// submitted with [`submit_plugin!`](crate::submit_plugin).
///
/// # Examples
///
/// ```rust
/// use plugin_registry::{FactoryCatalog, MemoryProperties, PluginsConfig};
/// use std::sync::Arc;
///
/// let config = PluginsConfig::default()
///     .with_namespace("myapp")
///     .with_properties(Arc::new(MemoryProperties::new()))
///     .with_loader(Arc::new(FactoryCatalog::new()));
///
/// assert_eq!(config.property_key("ErrorHandler"), "myapp.ErrorHandler.implementation");
/// ```
#[derive(Clone)]
pub struct PluginsConfig {
    namespace: String,
    properties: Arc<dyn PropertySource>,
    loader: Arc<dyn ImplementationLoader>,
}

impl PluginsConfig {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_properties(mut self, properties: Arc<dyn PropertySource>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_loader(mut self, loader: Arc<dyn ImplementationLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Configuration key naming the implementation of `extension_point`.
    pub fn property_key(&self, extension_point: &str) -> String {
        format!("{}.{}.implementation", self.namespace, extension_point)
    }

    pub(crate) fn properties(&self) -> &dyn PropertySource {
        self.properties.as_ref()
    }

    pub(crate) fn loader(&self) -> &dyn ImplementationLoader {
        self.loader.as_ref()
    }
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            properties: Arc::new(EnvProperties),
            loader: Arc::new(InventoryLoader),
        }
    }
}

impl std::fmt::Debug for PluginsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginsConfig")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}
