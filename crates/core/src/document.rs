//! Document representation shared by all components

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata filters used to narrow a retrieval call
pub type Filters = HashMap<String, serde_json::Value>;

/// A document flowing through the pipeline
///
/// Stores produce scored documents; components that create documents
/// from raw sources (e.g. transcription) leave `score` unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document ID
    pub id: String,
    /// Document content
    pub content: String,
    /// Relevance score assigned by a store (raw BM25 weight, or scaled
    /// to [0, 1) when the caller requested scaling)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    /// Document metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Create a new document
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            score: None,
            metadata: HashMap::new(),
        }
    }

    /// Add a metadata entry
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Set the relevance score
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}
