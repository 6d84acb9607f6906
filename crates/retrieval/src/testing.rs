//! Test doubles for the retrieval component
//!
//! `MemoryStore` is a deliberately small stand-in for a real document
//! store: it ranks by term frequency, which is enough to exercise the
//! retriever's dispatch, ordering, and round-trip contracts.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::json;

use docpipe_core::{
    Bm25Store, Document, DocumentStore, Error, Filters, Result, SerializedStore,
};

pub struct MemoryStore {
    documents: RwLock<Vec<Document>>,
}

impl MemoryStore {
    pub const TYPE_NAME: &'static str = "MemoryStore";

    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Registry factory reconstructing a store from its serialized form
    pub fn from_dict(serialized: &SerializedStore) -> Result<Arc<dyn Bm25Store>> {
        let documents: Vec<Document> =
            serde_json::from_value(serialized.init_parameters["documents"].clone())
                .map_err(|e| Error::Deserialization(format!("invalid store documents: {e}")))?;
        let store = Self::new();
        store.write_documents(documents)?;
        Ok(Arc::new(store))
    }

    fn matches_filters(doc: &Document, filters: Option<&Filters>) -> bool {
        match filters {
            None => true,
            Some(filters) => filters
                .iter()
                .all(|(key, value)| doc.metadata.get(key) == Some(value)),
        }
    }

    fn term_frequency(query: &str, content: &str) -> f32 {
        let content = content.to_lowercase();
        let tokens: Vec<&str> = content.split_whitespace().collect();
        query
            .to_lowercase()
            .split_whitespace()
            .map(|term| tokens.iter().filter(|t| **t == term).count() as f32)
            .sum()
    }
}

impl DocumentStore for MemoryStore {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn write_documents(&self, documents: Vec<Document>) -> Result<()> {
        self.documents.write().extend(documents);
        Ok(())
    }

    fn count_documents(&self) -> usize {
        self.documents.read().len()
    }

    fn to_dict(&self) -> SerializedStore {
        SerializedStore {
            type_name: Self::TYPE_NAME.to_string(),
            init_parameters: json!({ "documents": self.documents.read().clone() }),
        }
    }
}

impl Bm25Store for MemoryStore {
    fn bm25_retrieval(
        &self,
        query: &str,
        filters: Option<&Filters>,
        top_k: usize,
        scale_score: bool,
    ) -> Result<Vec<Document>> {
        let mut ranked: Vec<Document> = self
            .documents
            .read()
            .iter()
            .filter(|doc| Self::matches_filters(doc, filters))
            .map(|doc| {
                let raw = Self::term_frequency(query, &doc.content);
                let score = if scale_score { raw / (raw + 1.0) } else { raw };
                doc.clone().with_score(score)
            })
            .collect();

        // Stable sort keeps insertion order among equal scores.
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        ranked.truncate(top_k);
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_and_top_k() {
        let store = MemoryStore::new();
        store
            .write_documents(vec![
                Document::new("1", "rust rust rust"),
                Document::new("2", "rust once"),
                Document::new("3", "nothing relevant"),
            ])
            .unwrap();

        let ranked = store.bm25_retrieval("rust", None, 2, false).unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id, "1");
        assert_eq!(ranked[0].score, Some(3.0));
        assert_eq!(ranked[1].id, "2");
    }

    #[test]
    fn test_round_trip_preserves_documents() {
        let store = MemoryStore::new();
        store
            .write_documents(vec![Document::new("1", "alpha"), Document::new("2", "beta")])
            .unwrap();

        let restored = MemoryStore::from_dict(&store.to_dict()).unwrap();
        assert_eq!(restored.count_documents(), 2);
    }
}
