//! Macros for declaring extension points and plugin factories.

/// Declares a process-wide registry for one extension point.
///
/// The macro generates a module containing:
/// - a lazily created `PluginRegistry` static (hidden)
/// - `registry()`, the one accessor for that static
/// - `get()` and `register_override()` free functions delegating to it
///
/// The module glob-imports its parent module. Inside a function body (doctests
/// included) the parent is the enclosing module, not the function, so name the
/// capability by a path that resolves from there.
///
/// # Examples
///
/// ```rust
/// use plugin_registry::{define_extension_point, DefaultErrorHandler};
/// use std::sync::Arc;
///
/// define_extension_point!(error_handlers: dyn plugin_registry::ErrorHandler);
///
/// let handler = error_handlers::get().unwrap();
/// assert!(Arc::ptr_eq(&handler, &DefaultErrorHandler::instance()));
/// assert!(error_handlers::register_override(handler).is_err());
/// ```
///
/// A custom configuration can be supplied as an expression evaluated on first use:
///
/// ```rust
/// use plugin_registry::define_extension_point;
///
/// define_extension_point!(
///     app_handlers: dyn plugin_registry::ErrorHandler,
///     config = plugin_registry::PluginsConfig::default().with_namespace("myapp")
/// );
///
/// assert_eq!(app_handlers::registry().config().namespace(), "myapp");
/// ```
#[macro_export]
macro_rules! define_extension_point {
    ($name:ident : $ext:ty) => {
        $crate::define_extension_point!($name: $ext, config = $crate::PluginsConfig::default());
    };
    ($name:ident : $ext:ty, config = $config:expr) => {
        pub mod $name {
            #[allow(unused_imports)]
            use super::*;
            use std::sync::{Arc, LazyLock};

            // Registry storage (module-private)
            static REGISTRY: LazyLock<$crate::PluginRegistry<$ext>> =
                LazyLock::new(|| $crate::PluginRegistry::with_config($config));

            /// The process-wide registry of this extension point.
            pub fn registry() -> &'static $crate::PluginRegistry<$ext> {
                &REGISTRY
            }

            /// Resolve (on first call) and return the instance.
            pub fn get() -> Result<Arc<$ext>, $crate::PluginError> {
                REGISTRY.get()
            }

            /// Install an override; must run before the first `get`.
            pub fn register_override(instance: Arc<$ext>) -> Result<(), $crate::PluginError> {
                REGISTRY.register_override(instance)
            }

            /// Testing support only.
            #[doc(hidden)]
            pub fn reset() {
                REGISTRY.reset()
            }
        }
    };
}

/// Submits a named factory that [`InventoryLoader`](crate::InventoryLoader) can load.
///
/// Two forms are accepted:
///
/// - `submit_plugin!(dyn Capability, "name", expr)` builds `Arc::new(expr)` on each load.
/// - `submit_plugin!(dyn Capability, "name", factory = path)` calls `path()`, which
///   returns `Result<Impl, E>` with `E` convertible into a boxed error.
///
/// # Examples
///
/// ```rust
/// use plugin_registry::{submit_plugin, ErrorHandler, ImplementationLoader, InventoryLoader};
/// use std::sync::Arc;
///
/// struct Quiet;
/// impl ErrorHandler for Quiet {}
///
/// submit_plugin!(dyn ErrorHandler, "doc::Quiet", Quiet);
///
/// let erased = InventoryLoader.load("doc::Quiet").unwrap();
/// assert!(erased.downcast::<Arc<dyn ErrorHandler>>().is_ok());
/// ```
#[macro_export]
macro_rules! submit_plugin {
    ($ext:ty, $name:expr, factory = $create:path) => {
        $crate::inventory::submit! {
            $crate::PluginFactory::new($name, || {
                let value = $create()?;
                let instance: ::std::sync::Arc<$ext> = ::std::sync::Arc::new(value);
                ::std::result::Result::Ok($crate::PluginFactory::erase(instance))
            })
        }
    };
    ($ext:ty, $name:expr, $value:expr) => {
        $crate::inventory::submit! {
            $crate::PluginFactory::new($name, || {
                let instance: ::std::sync::Arc<$ext> = ::std::sync::Arc::new($value);
                ::std::result::Result::Ok($crate::PluginFactory::erase(instance))
            })
        }
    };
}
