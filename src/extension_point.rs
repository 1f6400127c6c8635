//! The capability contract a [`PluginRegistry`](crate::PluginRegistry) resolves.

use std::sync::Arc;

/// A pluggable capability resolved once per registry.
///
/// Implement this for the trait-object type of the capability
/// (`impl ExtensionPoint for dyn MyCapability`), so the registry can hand out
/// `Arc<dyn MyCapability>` regardless of which implementation won.
///
/// # Examples
///
/// ```rust
/// use plugin_registry::{ExtensionPoint, PluginRegistry};
/// use std::sync::{Arc, LazyLock};
///
/// trait Clock: Send + Sync + 'static {
///     fn now(&self) -> u64;
/// }
///
/// struct FixedClock;
/// impl Clock for FixedClock {
///     fn now(&self) -> u64 { 42 }
/// }
///
/// static DEFAULT_CLOCK: LazyLock<Arc<FixedClock>> = LazyLock::new(|| Arc::new(FixedClock));
///
/// impl ExtensionPoint for dyn Clock {
///     const NAME: &'static str = "Clock";
///
///     fn default_instance() -> Arc<Self> {
///         let clock: Arc<FixedClock> = Arc::clone(&DEFAULT_CLOCK);
///         clock
///     }
/// }
///
/// let clocks: PluginRegistry<dyn Clock> = PluginRegistry::new();
/// assert_eq!(clocks.get().unwrap().now(), 42);
/// ```
pub trait ExtensionPoint: Send + Sync + 'static {
    /// Stable simple name, used in configuration keys and error messages.
    const NAME: &'static str;

    /// Built-in fallback used when nothing was registered or configured.
    ///
    /// Should hand out the same shared instance on every call; the registry may
    /// call it from several threads racing on first resolution.
    fn default_instance() -> Arc<Self>;
}
