//! Serialization envelope for pipeline components
//!
//! The orchestration layer persists a pipeline by serializing each
//! component into a transport-neutral record. A component's bound store
//! is encoded in three explicit states: not bound (null), bound by name
//! only (string, resolved later at pipeline-assembly time), or bound to
//! a concrete instance (the store's own serialized record, inline).

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};
use crate::registry::StoreRegistry;

/// Serialized form of a document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedStore {
    /// Store type name, resolved against a [`StoreRegistry`]
    #[serde(rename = "type")]
    pub type_name: String,
    /// Constructor parameters for the store
    pub init_parameters: serde_json::Value,
}

/// The store field of a serialized component
///
/// Serializes as JSON `null` (unset), a string (deferred store name),
/// or a nested store record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreRef {
    Unset,
    Named(String),
    Inline(SerializedStore),
}

/// Serialized form of a pipeline component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedComponent {
    /// Opaque per-instance identity, not used for reconstruction
    #[serde(default)]
    pub hash: u64,
    /// Concrete component type name
    #[serde(rename = "type")]
    pub type_name: String,
    /// The component's store binding
    pub store: StoreRef,
    /// Constructor parameters for the component
    pub init_parameters: serde_json::Value,
}

impl SerializedComponent {
    /// Parse a raw record, verifying the `type` field against the
    /// concrete component's type name
    pub fn parse(value: serde_json::Value, expected_type: &str) -> Result<Self> {
        let type_name = value
            .get("type")
            .ok_or_else(|| Error::Deserialization("missing 'type' in component data".to_string()))?
            .as_str()
            .ok_or_else(|| Error::Deserialization("'type' must be a string".to_string()))?;

        if type_name != expected_type {
            return Err(Error::Deserialization(format!(
                "component '{}' cannot be deserialized as '{}'",
                type_name, expected_type
            )));
        }

        serde_json::from_value(value).map_err(|e| Error::Deserialization(e.to_string()))
    }
}

/// Persistence contract implemented by every pipeline component
pub trait Component: Sized {
    /// The component's declared type name, checked during deserialization
    fn type_name() -> &'static str;

    /// Serialize the component's configuration, including its bound
    /// store
    fn to_dict(&self) -> SerializedComponent;

    /// Reconstruct a component from its serialized form
    ///
    /// Embedded store records are resolved against `registry`; a store
    /// referenced by name is left for the orchestration layer to bind.
    fn from_dict(value: serde_json::Value, registry: &StoreRegistry) -> Result<Self>;
}

static INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Allocate an opaque identity for a new component instance
pub fn next_instance_id() -> u64 {
    INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed)
}
