//! BM25 retriever bound to an in-memory document store
//!
//! Ranking is delegated entirely to the bound store; this component owns
//! the query defaults, the store binding, and the batch dispatch.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use docpipe_core::component::next_instance_id;
use docpipe_core::{
    Bm25Store, Component, Document, Error, Filters, Result, SerializedComponent, StoreRef,
    StoreRegistry,
};

/// Query parameters captured at construction and used as fallbacks for
/// every run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryDefaults {
    /// Metadata filters narrowing the search space
    pub filters: Filters,
    /// Maximum number of documents to retrieve per query
    pub top_k: usize,
    /// Whether to scale raw BM25 weights into [0, 1)
    pub scale_score: bool,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            filters: Filters::new(),
            top_k: 10,
            scale_score: true,
        }
    }
}

impl QueryDefaults {
    /// Set the default top_k
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the default scale_score flag
    pub fn with_scale_score(mut self, scale_score: bool) -> Self {
        self.scale_score = scale_score;
        self
    }

    /// Add a default metadata filter
    pub fn with_filter(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::Config(format!(
                "top_k must be > 0, but got {}",
                self.top_k
            )));
        }
        Ok(())
    }
}

/// Per-call overrides for a single run
///
/// Any field left `None` falls back to the instance default captured at
/// construction.
#[derive(Debug, Clone, Default)]
pub struct QueryOverrides {
    pub filters: Option<Filters>,
    pub top_k: Option<usize>,
    pub scale_score: Option<bool>,
}

impl QueryOverrides {
    /// Override top_k for this call
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Override scale_score for this call
    pub fn with_scale_score(mut self, scale_score: bool) -> Self {
        self.scale_score = Some(scale_score);
        self
    }

    /// Override the filters for this call
    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = Some(filters);
        self
    }
}

/// The retriever's store slot
///
/// Unset at construction; the orchestration layer binds either a
/// concrete instance or, while assembling from a serialized pipeline, a
/// store name it resolves later. Never cleared automatically.
#[derive(Clone)]
pub enum StoreBinding {
    Unbound,
    Named(String),
    Bound(Arc<dyn Bm25Store>),
}

impl fmt::Debug for StoreBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbound => write!(f, "Unbound"),
            Self::Named(name) => write!(f, "Named({name:?})"),
            Self::Bound(store) => write!(f, "Bound({})", store.type_name()),
        }
    }
}

/// Structured output of a retrieval run: one ranked list per input
/// query, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalOutput {
    pub documents: Vec<Vec<Document>>,
}

/// A component retrieving documents from a BM25-capable store
///
/// Needs a bound store before [`run`](Self::run) can be called.
pub struct Bm25Retriever {
    defaults: QueryDefaults,
    store: StoreBinding,
    hash: u64,
}

impl Bm25Retriever {
    /// Create a retriever with the given query defaults
    ///
    /// Fails when `top_k` is 0.
    pub fn new(defaults: QueryDefaults) -> Result<Self> {
        defaults.validate()?;
        Ok(Self {
            defaults,
            store: StoreBinding::Unbound,
            hash: next_instance_id(),
        })
    }

    /// The defaults captured at construction
    pub fn defaults(&self) -> &QueryDefaults {
        &self.defaults
    }

    /// Current store binding state
    pub fn store(&self) -> &StoreBinding {
        &self.store
    }

    /// Bind a concrete store instance
    pub fn bind_store(&mut self, store: Arc<dyn Bm25Store>) {
        tracing::debug!(store_type = store.type_name(), "binding store");
        self.store = StoreBinding::Bound(store);
    }

    /// Bind a store by name, to be resolved by the orchestration layer
    pub fn bind_store_name(&mut self, name: impl Into<String>) {
        self.store = StoreBinding::Named(name.into());
    }

    /// Run the retriever over a batch of queries
    ///
    /// Each query is dispatched independently and in input order; the
    /// output holds one ranked list per query, same order. Errors from
    /// the store propagate unchanged and abort the whole batch.
    pub fn run(&self, queries: &[String], overrides: &QueryOverrides) -> Result<RetrievalOutput> {
        let store = match &self.store {
            StoreBinding::Bound(store) => store,
            _ => {
                return Err(Error::NotReady(
                    "Bm25Retriever needs a store to run: bind a BM25-capable store first"
                        .to_string(),
                ))
            }
        };

        if queries.is_empty() {
            return Err(Error::Config("queries must not be empty".to_string()));
        }
        if overrides.top_k == Some(0) {
            return Err(Error::Config("top_k must be > 0, but got 0".to_string()));
        }

        let filters = overrides.filters.as_ref().unwrap_or(&self.defaults.filters);
        let filters = (!filters.is_empty()).then_some(filters);
        let top_k = overrides.top_k.unwrap_or(self.defaults.top_k);
        let scale_score = overrides.scale_score.unwrap_or(self.defaults.scale_score);

        let mut documents = Vec::with_capacity(queries.len());
        for query in queries {
            let ranked = store.bm25_retrieval(query, filters, top_k, scale_score)?;
            documents.push(ranked);
        }

        tracing::debug!(
            queries = queries.len(),
            top_k,
            scale_score,
            "retrieval batch complete"
        );
        Ok(RetrievalOutput { documents })
    }
}

impl fmt::Debug for Bm25Retriever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bm25Retriever")
            .field("defaults", &self.defaults)
            .field("store", &self.store)
            .field("hash", &self.hash)
            .finish()
    }
}

impl Component for Bm25Retriever {
    fn type_name() -> &'static str {
        "Bm25Retriever"
    }

    fn to_dict(&self) -> SerializedComponent {
        let store = match &self.store {
            StoreBinding::Bound(store) => StoreRef::Inline(store.to_dict()),
            StoreBinding::Named(name) => StoreRef::Named(name.clone()),
            StoreBinding::Unbound => StoreRef::Unset,
        };
        SerializedComponent {
            hash: self.hash,
            type_name: Self::type_name().to_string(),
            store,
            init_parameters: serde_json::json!({
                "filters": self.defaults.filters,
                "top_k": self.defaults.top_k,
                "scale_score": self.defaults.scale_score,
            }),
        }
    }

    fn from_dict(value: serde_json::Value, registry: &StoreRegistry) -> Result<Self> {
        let data = SerializedComponent::parse(value, Self::type_name())?;

        // Keyword-binding semantics: unknown keys are rejected by serde,
        // missing keys take the constructor defaults, values go through
        // constructor validation.
        let defaults: QueryDefaults = serde_json::from_value(data.init_parameters)
            .map_err(|e| Error::Deserialization(format!("invalid init_parameters: {e}")))?;
        let mut component = Self::new(defaults)?;

        match data.store {
            StoreRef::Inline(serialized) => {
                component.store = StoreBinding::Bound(registry.resolve(&serialized)?);
            }
            StoreRef::Named(name) => component.store = StoreBinding::Named(name),
            StoreRef::Unset => {}
        }
        Ok(component)
    }
}
