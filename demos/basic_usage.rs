//! Basic usage example for plugin-registry.
//!
//! Demonstrates:
//! - Resolving the global error handler (default when nothing is configured)
//! - Selecting an implementation by name through the environment
//! - Registering an override up front and why late registration fails
//!
//! Run with: `cargo run --example basic_usage`
//! or: `PLUGIN_ERRORHANDLER_IMPLEMENTATION=demo::StderrHandler cargo run --example basic_usage`

use plugin_registry::{submit_plugin, DefaultErrorHandler, ErrorHandler, Plugins};
use std::error::Error;
use std::sync::Arc;

struct StderrHandler;

impl ErrorHandler for StderrHandler {
    fn handle_error(&self, error: &(dyn Error + Send + Sync + 'static)) {
        eprintln!("   [stderr-handler] {}", error);
    }
}

submit_plugin!(dyn ErrorHandler, "demo::StderrHandler", StderrHandler);

fn main() {
    println!("=== plugin-registry: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. Resolve the global handler
    // -------------------------------------------------------------------------
    println!("1. Resolving the error handler...");

    let handler = match Plugins::global().error_handler() {
        Ok(handler) => handler,
        Err(err) => {
            eprintln!("   Misconfigured plugin: {}", err);
            std::process::exit(1);
        }
    };

    if Arc::ptr_eq(&handler, &DefaultErrorHandler::instance()) {
        println!("   Using the built-in default handler");
    } else {
        println!("   Using the handler named in PLUGIN_ERRORHANDLER_IMPLEMENTATION");
    }

    handler.handle_error(&std::io::Error::other("something went wrong"));

    // -------------------------------------------------------------------------
    // 2. Late registration is rejected
    // -------------------------------------------------------------------------
    println!("\n2. Registering an override after first use...");

    match Plugins::global().register_error_handler(Arc::new(StderrHandler)) {
        Ok(()) => println!("   Accepted (unexpected)"),
        Err(err) => println!("   Rejected: {}", err),
    }

    // -------------------------------------------------------------------------
    // 3. Register up front on a dedicated instance
    // -------------------------------------------------------------------------
    println!("\n3. Registering an override before first use...");

    let plugins = Plugins::new();
    let stderr: Arc<dyn ErrorHandler> = Arc::new(StderrHandler);
    if plugins.register_error_handler(stderr.clone()).is_ok() {
        let resolved = plugins
            .error_handler()
            .expect("override is already installed");
        assert!(Arc::ptr_eq(&resolved, &stderr));
        resolved.handle_error(&std::io::Error::other("routed to the override"));
    }

    println!("\n=== Done ===");
}
