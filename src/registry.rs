//! Lazily resolved, write-once holder for one extension point.
//!
//! A [`PluginRegistry`] hands out a single agreed instance of a capability.
//! The instance is chosen on first use by order of precedence:
//!
//! 1. an instance passed to [`register_override`](PluginRegistry::register_override),
//! 2. an implementation named by the `<namespace>.<Name>.implementation` property,
//! 3. the extension point's [`default_instance`](ExtensionPoint::default_instance).
//!
//! # Examples
//!
//! ```
//! use plugin_registry::{DefaultErrorHandler, ErrorHandler, PluginRegistry};
//! use std::sync::Arc;
//!
//! let handlers: PluginRegistry<dyn ErrorHandler> = PluginRegistry::new();
//!
//! let first = handlers.get().unwrap();
//! let second = handlers.get().unwrap();
//! assert!(Arc::ptr_eq(&first, &second));
//! assert!(Arc::ptr_eq(&first, &DefaultErrorHandler::instance()));
//! ```

use std::sync::{Arc, Mutex};

use arc_swap::ArcSwapOption;

use crate::{ExtensionPoint, PluginError, PluginEvent, PluginsConfig, ResolutionSource};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `PluginEvent` every time the slot is
/// written or a resolution is attempted. It must be thread-safe because the
/// registry is usually shared process-wide.
pub type TraceCallback = dyn Fn(&PluginEvent) + Send + Sync + 'static;

/// Write-once registry for the extension point `T`.
///
/// `T` is normally a trait-object type such as `dyn ErrorHandler`. The slot
/// goes from unresolved to resolved exactly once, through a compare-and-set;
/// afterwards every caller sees the same `Arc<T>`.
pub struct PluginRegistry<T: ExtensionPoint + ?Sized> {
    // `ArcSwapOption` needs a sized pointee, hence the inner `Arc`.
    slot: ArcSwapOption<Arc<T>>,
    config: PluginsConfig,
    trace: Mutex<Option<Arc<TraceCallback>>>,
}

impl<T: ExtensionPoint + ?Sized> PluginRegistry<T> {
    /// Creates an unresolved registry reading configuration from the environment.
    pub fn new() -> Self {
        Self::with_config(PluginsConfig::default())
    }

    /// Creates an unresolved registry using the given collaborators.
    pub fn with_config(config: PluginsConfig) -> Self {
        Self {
            slot: ArcSwapOption::empty(),
            config,
            trace: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &PluginsConfig {
        &self.config
    }

    /// Returns the resolved instance, resolving it on first call.
    ///
    /// Concurrent first calls may each resolve a candidate; only one is
    /// installed and every caller gets that one back.
    ///
    /// # Errors
    ///
    /// Fails if an implementation is configured but cannot be produced
    /// (not found, not accessible, failed to instantiate, wrong type), or if the
    /// configuration itself is malformed. The default is never used as a
    /// fallback in that case.
    pub fn get(&self) -> Result<Arc<T>, PluginError> {
        if let Some(resolved) = self.current() {
            return Ok(resolved);
        }

        let (candidate, source) = match self.resolve_configured()? {
            Some((instance, implementation)) => {
                (instance, ResolutionSource::Property { implementation })
            }
            None => (T::default_instance(), ResolutionSource::Default),
        };

        let (resolved, installed) = match self.install(Arc::clone(&candidate)) {
            Ok(()) => (candidate, true),
            Err(winner) => (winner, false),
        };

        tracing::debug!(
            extension_point = T::NAME,
            %source,
            installed,
            "resolved plugin"
        );
        self.emit_event(&PluginEvent::Resolve {
            extension_point: T::NAME,
            source,
            installed,
        });

        Ok(resolved)
    }

    /// Installs `instance` as the permanent value for this extension point.
    ///
    /// Must happen before anything calls [`get`](Self::get).
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::AlreadyRegistered`] if the slot is already
    /// populated, either by an earlier override or by a `get`. The installed
    /// value is left untouched.
    pub fn register_override(&self, instance: Arc<T>) -> Result<(), PluginError> {
        let accepted = self.install(instance).is_ok();

        self.emit_event(&PluginEvent::Register {
            extension_point: T::NAME,
            accepted,
        });

        if accepted {
            tracing::debug!(extension_point = T::NAME, "registered plugin override");
            Ok(())
        } else {
            tracing::warn!(
                extension_point = T::NAME,
                "plugin override rejected, an implementation is already in place"
            );
            Err(PluginError::AlreadyRegistered {
                extension_point: T::NAME,
            })
        }
    }

    /// Whether the slot has been populated.
    pub fn is_resolved(&self) -> bool {
        self.slot.load().is_some()
    }

    /// Clears the slot so the next `get` resolves again.
    ///
    /// Testing support only. Production code must never call this: handles
    /// already given out stay alive and would diverge from later ones.
    #[doc(hidden)]
    pub fn reset(&self) {
        self.slot.store(None);
        self.emit_event(&PluginEvent::Reset {
            extension_point: T::NAME,
        });
    }

    /// Sets a tracing callback invoked for every event of this registry.
    ///
    /// The callback runs after the lock guarding it is released, so it may
    /// call back into this registry. Events it causes are delivered to it
    /// recursively.
    pub fn set_trace_callback(&self, callback: impl Fn(&PluginEvent) + Send + Sync + 'static) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clears the tracing callback.
    pub fn clear_trace_callback(&self) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    fn emit_event(&self, event: &PluginEvent) {
        let callback = self
            .trace
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    fn current(&self) -> Option<Arc<T>> {
        self.slot.load().as_deref().cloned()
    }

    /// Set-if-empty. On failure returns the value already installed.
    fn install(&self, instance: Arc<T>) -> Result<(), Arc<T>> {
        let empty: Option<Arc<Arc<T>>> = None;
        let prev = self.slot.compare_and_swap(&empty, Some(Arc::new(instance)));
        match prev.as_deref() {
            None => Ok(()),
            Some(existing) => Err(Arc::clone(existing)),
        }
    }

    /// Loads the implementation named in configuration, if one is named.
    fn resolve_configured(&self) -> Result<Option<(Arc<T>, String)>, PluginError> {
        let key = self.config.property_key(T::NAME);
        let Some(raw) = self.config.properties().property(&key)? else {
            return Ok(None);
        };

        let implementation = raw.trim();
        if implementation.is_empty() {
            return Err(PluginError::InvalidConfiguration {
                key,
                reason: "implementation name is empty".to_string(),
            });
        }

        let erased = self
            .config
            .loader()
            .load(implementation)
            .map_err(|err| PluginError::from_load(T::NAME, implementation, err));
        let erased = match erased {
            Ok(erased) => erased,
            Err(err) => {
                tracing::warn!(
                    extension_point = T::NAME,
                    implementation,
                    error = %err,
                    "configured plugin could not be loaded"
                );
                return Err(err);
            }
        };

        match erased.downcast::<Arc<T>>() {
            Ok(instance) => Ok(Some((*instance, implementation.to_string()))),
            Err(_) => {
                tracing::warn!(
                    extension_point = T::NAME,
                    implementation,
                    "configured plugin has the wrong type"
                );
                Err(PluginError::TypeMismatch {
                    extension_point: T::NAME,
                    implementation: implementation.to_string(),
                })
            }
        }
    }
}

impl<T: ExtensionPoint + ?Sized> Default for PluginRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ExtensionPoint + ?Sized> std::fmt::Debug for PluginRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("extension_point", &T::NAME)
            .field("resolved", &self.is_resolved())
            .field("config", &self.config)
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
