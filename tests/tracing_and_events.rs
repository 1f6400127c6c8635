//! Integration tests for tracing and event monitoring.
//!
//! This test demonstrates how to use the tracing callback to watch a registry
//! resolve, accept or reject overrides, and get reset.

use plugin_registry::{
    ErrorHandler, FactoryCatalog, MemoryProperties, PluginEvent, PluginRegistry, PluginsConfig,
    ResolutionSource,
};
use std::sync::{Arc, Mutex};

struct Recorded;
impl ErrorHandler for Recorded {}

fn registry(props: MemoryProperties, catalog: FactoryCatalog) -> PluginRegistry<dyn ErrorHandler> {
    PluginRegistry::with_config(
        PluginsConfig::default()
            .with_properties(Arc::new(props))
            .with_loader(Arc::new(catalog)),
    )
}

fn collect(registry: &PluginRegistry<dyn ErrorHandler>) -> Arc<Mutex<Vec<String>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    registry.set_trace_callback(move |event| {
        events_clone.lock().unwrap().push(format!("{}", event));
    });
    events
}

#[test]
fn test_basic_tracing() {
    let registry = registry(MemoryProperties::new(), FactoryCatalog::new());
    let events = collect(&registry);

    registry.get().unwrap();
    registry.get().unwrap();
    let _ = registry.register_override(Arc::new(Recorded));
    registry.reset();

    let captured = events.lock().unwrap();
    assert_eq!(
        *captured,
        vec![
            "resolve { extension_point: ErrorHandler, source: default, installed: true }",
            "register { extension_point: ErrorHandler, accepted: false }",
            "reset { extension_point: ErrorHandler }",
        ]
    );
}

#[test]
fn test_trace_property_resolution() {
    let props = MemoryProperties::new().with("plugin.ErrorHandler.implementation", "recorded");
    let catalog = FactoryCatalog::new();
    catalog.register("recorded", || {
        let handler: Arc<dyn ErrorHandler> = Arc::new(Recorded);
        Ok(handler)
    });
    let registry = registry(props, catalog);

    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    registry.set_trace_callback(move |event| {
        events_clone.lock().unwrap().push(event.clone());
    });

    registry.get().unwrap();

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 1);
    match &captured[0] {
        PluginEvent::Resolve {
            extension_point,
            source,
            installed,
        } => {
            assert_eq!(*extension_point, "ErrorHandler");
            assert_eq!(
                *source,
                ResolutionSource::Property {
                    implementation: "recorded".to_string()
                }
            );
            assert!(*installed);
        }
        other => panic!("unexpected event: {}", other),
    }
}

#[test]
fn test_failed_resolution_emits_nothing() {
    let props = MemoryProperties::new().with("plugin.ErrorHandler.implementation", "missing");
    let registry = registry(props, FactoryCatalog::new());
    let events = collect(&registry);

    assert!(registry.get().is_err());
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_clear_trace_callback() {
    let registry = registry(MemoryProperties::new(), FactoryCatalog::new());
    let events = collect(&registry);

    registry.register_override(Arc::new(Recorded)).unwrap();
    registry.clear_trace_callback();
    registry.get().unwrap();

    let captured = events.lock().unwrap();
    assert_eq!(
        *captured,
        vec!["register { extension_point: ErrorHandler, accepted: true }"]
    );
}

#[test]
fn test_tracing_isolated_per_registry() {
    let traced = registry(MemoryProperties::new(), FactoryCatalog::new());
    let untraced = registry(MemoryProperties::new(), FactoryCatalog::new());
    let events = collect(&traced);

    untraced.get().unwrap();
    untraced.reset();

    assert!(events.lock().unwrap().is_empty());
}
