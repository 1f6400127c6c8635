//! Process-wide plugin facade.

use std::sync::{Arc, LazyLock};

use crate::{ErrorHandler, PluginError, PluginRegistry, PluginsConfig};

static GLOBAL: LazyLock<Plugins> = LazyLock::new(Plugins::new);

/// The set of extension points an application resolves.
///
/// Use [`Plugins::global`] for the process-wide instance, or build one with
/// [`Plugins::with_config`] and pass it around explicitly.
///
/// # Examples
///
/// ```rust
/// use plugin_registry::{ErrorHandler, Plugins};
/// use std::sync::Arc;
///
/// struct Quiet;
/// impl ErrorHandler for Quiet {}
///
/// let plugins = Plugins::new();
/// let quiet: Arc<dyn ErrorHandler> = Arc::new(Quiet);
/// plugins.register_error_handler(quiet.clone()).unwrap();
///
/// assert!(Arc::ptr_eq(&plugins.error_handler().unwrap(), &quiet));
/// assert!(plugins.register_error_handler(Arc::new(Quiet)).is_err());
/// ```
#[derive(Debug)]
pub struct Plugins {
    error_handler: PluginRegistry<dyn ErrorHandler>,
}

impl Plugins {
    /// The process-wide instance, created on first use and never torn down.
    pub fn global() -> &'static Plugins {
        &GLOBAL
    }

    pub fn new() -> Self {
        Self::with_config(PluginsConfig::default())
    }

    pub fn with_config(config: PluginsConfig) -> Self {
        Self {
            error_handler: PluginRegistry::with_config(config),
        }
    }

    /// Error handler to use, resolved by order of precedence.
    ///
    /// Override the default with [`register_error_handler`](Self::register_error_handler)
    /// or by setting `plugin.ErrorHandler.implementation` (environment variable
    /// `PLUGIN_ERRORHANDLER_IMPLEMENTATION`) to the name of a submitted factory.
    pub fn error_handler(&self) -> Result<Arc<dyn ErrorHandler>, PluginError> {
        self.error_handler.get()
    }

    /// Registers `handler` as the global override.
    ///
    /// # Errors
    ///
    /// [`PluginError::AlreadyRegistered`] if called more than once, or after
    /// [`error_handler`](Self::error_handler) has already resolved a value.
    pub fn register_error_handler(
        &self,
        handler: Arc<dyn ErrorHandler>,
    ) -> Result<(), PluginError> {
        self.error_handler.register_override(handler)
    }

    pub fn error_handler_registry(&self) -> &PluginRegistry<dyn ErrorHandler> {
        &self.error_handler
    }

    /// Returns every extension point to the unresolved state.
    ///
    /// Testing support only; production code must never call this.
    #[doc(hidden)]
    pub fn reset(&self) {
        self.error_handler.reset();
    }
}

impl Default for Plugins {
    fn default() -> Self {
        Self::new()
    }
}
