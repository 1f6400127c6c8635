/// Where a resolved plugin instance came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Loaded by name from the configured implementation property.
    Property {
        /// The configured implementation name.
        implementation: String,
    },
    /// The extension point's built-in default.
    Default,
}

impl std::fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionSource::Property { implementation } => {
                write!(f, "property({})", implementation)
            }
            ResolutionSource::Default => write!(f, "default"),
        }
    }
}

/// Events emitted by a plugin registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use plugin_registry::PluginEvent;
///
/// let event = PluginEvent::Register { extension_point: "ErrorHandler", accepted: true };
/// assert_eq!(event.to_string(), "register { extension_point: ErrorHandler, accepted: true }");
/// ```
#[derive(Debug, Clone)]
pub enum PluginEvent {
    /// An explicit override was attempted.
    Register {
        extension_point: &'static str,
        /// `false` when the slot was already populated.
        accepted: bool,
    },

    /// An unresolved `get` produced a candidate instance.
    Resolve {
        extension_point: &'static str,
        source: ResolutionSource,
        /// Whether this candidate won the compare-and-set.
        installed: bool,
    },

    /// The slot was cleared through the testing hook.
    Reset { extension_point: &'static str },
}

impl std::fmt::Display for PluginEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginEvent::Register {
                extension_point,
                accepted,
            } => write!(
                f,
                "register {{ extension_point: {}, accepted: {} }}",
                extension_point, accepted
            ),
            PluginEvent::Resolve {
                extension_point,
                source,
                installed,
            } => write!(
                f,
                "resolve {{ extension_point: {}, source: {}, installed: {} }}",
                extension_point, source, installed
            ),
            PluginEvent::Reset { extension_point } => {
                write!(f, "reset {{ extension_point: {} }}", extension_point)
            }
        }
    }
}
