//! Store capability traits
//!
//! Components declare the store capability they need as a trait bound.
//! A retriever that requires BM25 ranking binds to `dyn Bm25Store`, so
//! an incompatible store cannot be assigned in the first place.

use crate::component::SerializedStore;
use crate::document::{Document, Filters};
use crate::error::Result;

/// Base capability of every document store
///
/// Implementations live outside this workspace; tests provide mocks.
pub trait DocumentStore: Send + Sync {
    /// Store type name, used as the registry key when reconstructing
    /// an embedded store from its serialized form
    fn type_name(&self) -> &str;

    /// Write documents into the store
    fn write_documents(&self, documents: Vec<Document>) -> Result<()>;

    /// Number of documents currently held
    fn count_documents(&self) -> usize;

    /// Serialize the store's full configuration
    fn to_dict(&self) -> SerializedStore;
}

/// BM25 retrieval capability over an in-memory corpus
pub trait Bm25Store: DocumentStore {
    /// Rank documents against `query` and return up to `top_k` of them
    /// in the store's BM25 order
    ///
    /// # Arguments
    /// * `query` - Query string
    /// * `filters` - Optional metadata filters narrowing the search space
    /// * `top_k` - Maximum number of documents to return
    /// * `scale_score` - Whether to scale raw BM25 weights into [0, 1)
    fn bm25_retrieval(
        &self,
        query: &str,
        filters: Option<&Filters>,
        top_k: usize,
        scale_score: bool,
    ) -> Result<Vec<Document>>;
}
