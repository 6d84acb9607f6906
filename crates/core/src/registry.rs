//! Store type registry
//!
//! Maps store type names to reconstruction factories. The orchestration
//! layer builds one at startup with explicit `register` calls and passes
//! it wherever components are deserialized.

use std::collections::HashMap;
use std::sync::Arc;

use crate::component::SerializedStore;
use crate::error::{Error, Result};
use crate::store::Bm25Store;

type StoreFactory = Box<dyn Fn(&SerializedStore) -> Result<Arc<dyn Bm25Store>> + Send + Sync>;

/// Registry of reconstructible store types
#[derive(Default)]
pub struct StoreRegistry {
    factories: HashMap<String, StoreFactory>,
}

impl StoreRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a store type name
    ///
    /// A later registration for the same name replaces the earlier one.
    pub fn register<F>(&mut self, type_name: impl Into<String>, factory: F)
    where
        F: Fn(&SerializedStore) -> Result<Arc<dyn Bm25Store>> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        tracing::debug!(store_type = %type_name, "registering store type");
        self.factories.insert(type_name, Box::new(factory));
    }

    /// Reconstruct a store from its serialized record
    pub fn resolve(&self, serialized: &SerializedStore) -> Result<Arc<dyn Bm25Store>> {
        let factory = self.factories.get(&serialized.type_name).ok_or_else(|| {
            Error::Deserialization(format!(
                "store type '{}' is not registered",
                serialized.type_name
            ))
        })?;
        factory(serialized)
    }

    /// Whether a type name has a registered factory
    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }
}
