//! Error-handling strategy extension point.

use std::error::Error;
use std::sync::{Arc, LazyLock};

use crate::ExtensionPoint;

/// Receives errors that could not be delivered anywhere else.
///
/// Implementations must be cheap to construct and free of side effects at
/// construction, since racing resolutions may build more than one.
pub trait ErrorHandler: Send + Sync + 'static {
    /// Called with an otherwise undeliverable error. Ignores it by default.
    fn handle_error(&self, error: &(dyn Error + Send + Sync + 'static)) {
        let _ = error;
    }
}

/// Built-in handler used when no other implementation is registered or configured.
#[derive(Debug, Default)]
pub struct DefaultErrorHandler;

static DEFAULT_INSTANCE: LazyLock<Arc<DefaultErrorHandler>> =
    LazyLock::new(|| Arc::new(DefaultErrorHandler));

impl DefaultErrorHandler {
    /// The shared process-wide default instance.
    pub fn instance() -> Arc<dyn ErrorHandler> {
        let handler: Arc<DefaultErrorHandler> = Arc::clone(&DEFAULT_INSTANCE);
        handler
    }
}

impl ErrorHandler for DefaultErrorHandler {}

impl ExtensionPoint for dyn ErrorHandler {
    const NAME: &'static str = "ErrorHandler";

    fn default_instance() -> Arc<Self> {
        DefaultErrorHandler::instance()
    }
}
