//! BM25 retrieval component
//!
//! Features:
//! - Batch query fan-out against a single BM25-capable store
//! - Per-call overrides with fallback to construction-time defaults
//! - Explicit store binding states (unbound, named, bound)
//! - Serialization envelope round-trip, including an embedded store

pub mod bm25;

#[cfg(test)]
mod testing;

pub use bm25::{Bm25Retriever, QueryDefaults, QueryOverrides, RetrievalOutput, StoreBinding};
