//! # Plugin Registry
//!
//! A process-wide registry resolving pluggable capabilities ("extension points")
//! by order of precedence:
//!
//! 1. an implementation registered programmatically before first use,
//! 2. an implementation named in configuration
//!    (`plugin.<ExtensionPointName>.implementation`),
//! 3. the built-in default.
//!
//! Each extension point is resolved once and then stays fixed for the lifetime
//! of the process. Resolution is lock-free: racing first callers may each build
//! a candidate, but a compare-and-set installs exactly one and everybody gets
//! that one back.
//!
//! ## Quick Start
//!
//! ```rust
//! use plugin_registry::{DefaultErrorHandler, Plugins};
//! use std::sync::Arc;
//!
//! let handler = Plugins::global().error_handler().unwrap();
//! assert!(Arc::ptr_eq(&handler, &DefaultErrorHandler::instance()));
//! ```
//!
//! ## Main Types
//!
//! - [`PluginRegistry`] - write-once holder for one extension point
//! - [`Plugins`] - the process-wide set of extension points
//! - [`ExtensionPoint`] - contract a capability type implements to be resolvable
//! - [`PropertySource`] / [`ImplementationLoader`] - where names come from and how they load
//! - [`define_extension_point!`] / [`submit_plugin!`] - declare registries and named factories

mod config;
mod error_handler;
mod extension_point;
mod loader;
mod macros;
mod plugin_error;
mod plugin_event;
mod plugins;
mod properties;
mod registry;

#[doc(hidden)]
pub use inventory;

pub use config::{PluginsConfig, DEFAULT_NAMESPACE};
pub use error_handler::{DefaultErrorHandler, ErrorHandler};
pub use extension_point::ExtensionPoint;
pub use loader::{
    ErasedInstance, FactoryCatalog, ImplementationLoader, InventoryLoader, PluginFactory,
    Visibility,
};
pub use plugin_error::{BoxError, LoadError, PluginError};
pub use plugin_event::{PluginEvent, ResolutionSource};
pub use plugins::Plugins;
pub use properties::{EnvProperties, MemoryProperties, PropertySource};
pub use registry::{PluginRegistry, TraceCallback};
