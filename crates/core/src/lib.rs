//! Core traits and types for docpipe components
//!
//! This crate provides the foundational pieces shared by every pipeline
//! component:
//! - The `Document` representation flowing between components
//! - Store capability traits for pluggable document stores
//! - The serialization envelope used when saving/loading pipelines
//! - The store type registry for reconstructing embedded stores
//! - Error types

pub mod component;
pub mod document;
pub mod error;
pub mod registry;
pub mod store;

pub use component::{Component, SerializedComponent, SerializedStore, StoreRef};
pub use document::{Document, Filters};
pub use error::{Error, Result};
pub use registry::StoreRegistry;
pub use store::{Bm25Store, DocumentStore};
