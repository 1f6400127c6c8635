//! Name-to-instance resolution.
//!
//! An [`ImplementationLoader`] turns a configured implementation name into a
//! type-erased instance. Two loaders ship with the crate:
//!
//! - [`InventoryLoader`] looks names up among [`PluginFactory`] entries submitted
//!   at link time with [`submit_plugin!`](crate::submit_plugin).
//! - [`FactoryCatalog`] holds factories registered at runtime.
//!
//! The loader does not check the produced type; the registry downcasts the
//! result and reports a type mismatch itself.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{BoxError, ExtensionPoint, LoadError};

/// Type-erased plugin instance. Holds an `Arc<T>` for some capability `T`.
pub type ErasedInstance = Box<dyn Any + Send + Sync>;

/// Produces plugin instances from implementation names.
pub trait ImplementationLoader: Send + Sync {
    /// Instantiates the implementation registered under `implementation`.
    ///
    /// # Errors
    ///
    /// - [`LoadError::NotFound`] if no factory has that name
    /// - [`LoadError::AccessDenied`] if the factory may not be loaded by name
    /// - [`LoadError::Instantiation`] if the factory itself failed
    fn load(&self, implementation: &str) -> Result<ErasedInstance, LoadError>;
}

/// Whether a factory can be selected through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    /// Known by name, but loading it by name is refused.
    Restricted,
}

/// A named factory collected through `inventory`.
pub struct PluginFactory {
    pub name: &'static str,
    pub visibility: Visibility,
    create: fn() -> Result<ErasedInstance, BoxError>,
}

inventory::collect!(PluginFactory);

impl PluginFactory {
    pub const fn new(name: &'static str, create: fn() -> Result<ErasedInstance, BoxError>) -> Self {
        Self {
            name,
            visibility: Visibility::Public,
            create,
        }
    }

    pub const fn restricted(
        name: &'static str,
        create: fn() -> Result<ErasedInstance, BoxError>,
    ) -> Self {
        Self {
            name,
            visibility: Visibility::Restricted,
            create,
        }
    }

    /// Wraps a capability instance the way the registry expects to find it.
    ///
    /// `T` must be the capability type itself (`dyn Capability`), since the
    /// registry downcasts to exactly `Arc<T>`.
    pub fn erase<T: ?Sized + Send + Sync + 'static>(instance: Arc<T>) -> ErasedInstance {
        Box::new(instance)
    }

    fn instantiate(&self) -> Result<ErasedInstance, LoadError> {
        if self.visibility == Visibility::Restricted {
            return Err(LoadError::AccessDenied);
        }
        (self.create)().map_err(LoadError::Instantiation)
    }
}

impl std::fmt::Debug for PluginFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginFactory")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .finish()
    }
}

/// Resolves names against every [`PluginFactory`] linked into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryLoader;

impl InventoryLoader {
    /// Looks up a linked factory by name.
    pub fn find(implementation: &str) -> Option<&'static PluginFactory> {
        inventory::iter::<PluginFactory>
            .into_iter()
            .find(|factory| factory.name == implementation)
    }
}

impl ImplementationLoader for InventoryLoader {
    fn load(&self, implementation: &str) -> Result<ErasedInstance, LoadError> {
        Self::find(implementation)
            .ok_or(LoadError::NotFound)?
            .instantiate()
    }
}

type CatalogFactory = Arc<dyn Fn() -> Result<ErasedInstance, BoxError> + Send + Sync>;

struct CatalogEntry {
    visibility: Visibility,
    create: CatalogFactory,
}

/// Named factories registered at runtime.
///
/// Registering a name twice replaces the earlier factory.
///
/// # Examples
///
/// ```rust
/// use plugin_registry::{ErrorHandler, FactoryCatalog, ImplementationLoader};
/// use std::sync::Arc;
///
/// struct Quiet;
/// impl ErrorHandler for Quiet {}
///
/// let catalog = FactoryCatalog::new();
/// catalog.register::<dyn ErrorHandler>("quiet", || Ok(Arc::new(Quiet)));
///
/// let erased = catalog.load("quiet").unwrap();
/// assert!(erased.downcast::<Arc<dyn ErrorHandler>>().is_ok());
/// ```
#[derive(Default)]
pub struct FactoryCatalog {
    entries: RwLock<HashMap<String, CatalogEntry>>,
}

impl FactoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a loadable factory for the extension point `E` under `name`.
    ///
    /// The factory's result is stored as an `Arc<E>`, so a concrete
    /// implementation coerces to the capability type at registration.
    pub fn register<E>(
        &self,
        name: impl Into<String>,
        create: impl Fn() -> Result<Arc<E>, BoxError> + Send + Sync + 'static,
    ) where
        E: ExtensionPoint + ?Sized,
    {
        self.insert(name.into(), Visibility::Public, erasing(create));
    }

    /// Registers a factory for `E` that is known by name but refuses to load.
    pub fn register_restricted<E>(
        &self,
        name: impl Into<String>,
        create: impl Fn() -> Result<Arc<E>, BoxError> + Send + Sync + 'static,
    ) where
        E: ExtensionPoint + ?Sized,
    {
        self.insert(name.into(), Visibility::Restricted, erasing(create));
    }

    /// Registers a factory producing an already erased value.
    ///
    /// Nothing ties the value to an extension point; a registry that loads it
    /// reports a type mismatch unless it holds an `Arc` of that registry's type.
    pub fn register_erased(
        &self,
        name: impl Into<String>,
        create: impl Fn() -> Result<ErasedInstance, BoxError> + Send + Sync + 'static,
    ) {
        self.insert(name.into(), Visibility::Public, Arc::new(create));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .contains_key(name)
    }

    fn insert(&self, name: String, visibility: Visibility, create: CatalogFactory) {
        self.entries
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .insert(name, CatalogEntry { visibility, create });
    }
}

fn erasing<E, F>(create: F) -> CatalogFactory
where
    E: ExtensionPoint + ?Sized,
    F: Fn() -> Result<Arc<E>, BoxError> + Send + Sync + 'static,
{
    Arc::new(move || create().map(PluginFactory::erase))
}

impl ImplementationLoader for FactoryCatalog {
    fn load(&self, implementation: &str) -> Result<ErasedInstance, LoadError> {
        // Clone the factory out so it runs without the lock held.
        let (visibility, create) = {
            let entries = self.entries.read().unwrap_or_else(|p| p.into_inner());
            let entry = entries.get(implementation).ok_or(LoadError::NotFound)?;
            (entry.visibility, Arc::clone(&entry.create))
        };

        if visibility == Visibility::Restricted {
            return Err(LoadError::AccessDenied);
        }
        create().map_err(LoadError::Instantiation)
    }
}

impl std::fmt::Debug for FactoryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.read().unwrap_or_else(|p| p.into_inner());
        f.debug_struct("FactoryCatalog")
            .field("names", &entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_factory() -> Result<ErasedInstance, BoxError> {
        Ok(PluginFactory::erase(Arc::new(7u32)))
    }

    fn failing_factory() -> Result<ErasedInstance, BoxError> {
        Err("no resources".into())
    }

    inventory::submit! {
        PluginFactory::new("loader_tests::Seven", unit_factory)
    }

    inventory::submit! {
        PluginFactory::restricted("loader_tests::Hidden", unit_factory)
    }

    inventory::submit! {
        PluginFactory::new("loader_tests::Failing", failing_factory)
    }

    #[test]
    fn test_inventory_loader_finds_submitted_factory() {
        let erased = InventoryLoader.load("loader_tests::Seven").unwrap();
        let value = erased.downcast::<Arc<u32>>().unwrap();
        assert_eq!(**value, 7);
    }

    #[test]
    fn test_inventory_loader_distinguishes_failures() {
        assert!(matches!(
            InventoryLoader.load("loader_tests::Missing"),
            Err(LoadError::NotFound)
        ));
        assert!(matches!(
            InventoryLoader.load("loader_tests::Hidden"),
            Err(LoadError::AccessDenied)
        ));
        assert!(matches!(
            InventoryLoader.load("loader_tests::Failing"),
            Err(LoadError::Instantiation(_))
        ));
    }

    #[test]
    fn test_inventory_find_reports_visibility() {
        let factory = InventoryLoader::find("loader_tests::Hidden").unwrap();
        assert_eq!(factory.visibility, Visibility::Restricted);
        assert!(format!("{:?}", factory).contains("loader_tests::Hidden"));
    }

    trait Numbered: Send + Sync + 'static {
        fn number(&self) -> u32;
    }

    struct Fixed(u32);

    impl Numbered for Fixed {
        fn number(&self) -> u32 {
            self.0
        }
    }

    impl ExtensionPoint for dyn Numbered {
        const NAME: &'static str = "Numbered";

        fn default_instance() -> Arc<Self> {
            Arc::new(Fixed(0))
        }
    }

    fn load_number(catalog: &FactoryCatalog, name: &str) -> u32 {
        let erased = catalog.load(name).unwrap();
        erased.downcast::<Arc<dyn Numbered>>().unwrap().number()
    }

    #[test]
    fn test_catalog_register_and_load() {
        let catalog = FactoryCatalog::new();
        catalog.register::<dyn Numbered>("three", || Ok(Arc::new(Fixed(3))));
        assert!(catalog.contains("three"));
        assert!(!catalog.contains("other"));

        assert_eq!(load_number(&catalog, "three"), 3);
    }

    #[test]
    fn test_catalog_stores_concrete_factory_as_capability() {
        fn concrete() -> Result<Arc<Fixed>, BoxError> {
            Ok(Arc::new(Fixed(9)))
        }

        let catalog = FactoryCatalog::new();
        catalog.register::<dyn Numbered>("nine", || Ok(concrete()?));

        let erased = catalog.load("nine").unwrap();
        assert!(!erased.is::<Arc<Fixed>>());
        assert_eq!(erased.downcast::<Arc<dyn Numbered>>().unwrap().number(), 9);
    }

    #[test]
    fn test_catalog_failures() {
        let catalog = FactoryCatalog::new();
        catalog.register_restricted::<dyn Numbered>("hidden", || Ok(Arc::new(Fixed(1))));
        catalog.register::<dyn Numbered>("broken", || Err("disk on fire".into()));

        assert!(matches!(catalog.load("missing"), Err(LoadError::NotFound)));
        assert!(matches!(catalog.load("hidden"), Err(LoadError::AccessDenied)));
        match catalog.load("broken") {
            Err(LoadError::Instantiation(source)) => assert_eq!(source.to_string(), "disk on fire"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_catalog_erased_factory_is_stored_as_is() {
        let catalog = FactoryCatalog::new();
        catalog.register_erased("text", || Ok(PluginFactory::erase(Arc::new(String::from("hi")))));

        let erased = catalog.load("text").unwrap();
        assert_eq!(erased.downcast::<Arc<String>>().unwrap().as_str(), "hi");
    }

    #[test]
    fn test_catalog_replaces_factory() {
        let catalog = FactoryCatalog::new();
        catalog.register::<dyn Numbered>("value", || Ok(Arc::new(Fixed(1))));
        catalog.register::<dyn Numbered>("value", || Ok(Arc::new(Fixed(2))));

        assert_eq!(load_number(&catalog, "value"), 2);
    }
}
