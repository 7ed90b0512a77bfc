//! # TopicX
//!
//! Topic-model vector post-processing, inference orchestration and
//! similarity retrieval over a search cluster.
//!
//! TopicX turns the dense theta and beta distributions of trained topic
//! models into exact-sum sparse integer vectors, indexes them alongside
//! schema-filtered document metadata, and answers similarity queries
//! scored with Jensen-Shannon divergence.
//!
//! ## Quick Start
//!
//! ```rust
//! use topicx::prelude::*;
//! use std::sync::Arc;
//!
//! // Register a corpus schema
//! let config = CorpusConfig {
//!     name: "cordis".to_string(),
//!     id_field: "projectID".to_string(),
//!     title_field: "title".to_string(),
//!     date_field: "startDate".to_string(),
//!     displayed_fields: vec!["objective".to_string()],
//!     searchable_fields: vec!["title".to_string(), "objective".to_string()],
//! };
//! let registry = Arc::new(CorpusRegistry::new(vec![config], []).unwrap());
//!
//! // Quantize a raw theta distribution into a sparse integer vector
//! let budgets = GlobalBudgets::default();
//! let entries = sparsify_quantize(&[0.7, 0.0, 0.3], &budgets.theta_budget()).unwrap();
//! let theta = SparseTopicVector::new("mallet-25", entries).unwrap();
//!
//! // Index and query
//! let adapter = IndexingAdapter::new(registry);
//! let doc = Document::new("d1", "ocean acidification")
//!     .with_field("title", serde_json::json!("Ocean acidification"));
//! let record = adapter.build_record("cordis", &doc, &[theta.clone()]).unwrap();
//!
//! let cluster = InMemoryCluster::new();
//! cluster.index("cordis", vec![record]);
//! cluster.commit().unwrap();
//!
//! let hits = cluster
//!     .query("cordis", &SimilarityQuery::new("mallet-25", theta))
//!     .unwrap();
//! assert_eq!(hits[0].id, "d1");
//! ```
//!
//! ## Crate Structure
//!
//! TopicX is composed of several crates:
//!
//! - [`topicx-core`](https://docs.rs/topicx-core) - Sparse vectors, quantization, documents, errors
//! - [`topicx-schema`](https://docs.rs/topicx-schema) - Corpus configuration registry and global budgets
//! - [`topicx-similarity`](https://docs.rs/topicx-similarity) - Divergence measures over sparse vectors
//! - [`topicx-inference`](https://docs.rs/topicx-inference) - Batching orchestrator for inference backends
//! - [`topicx-index`](https://docs.rs/topicx-index) - Indexing adapter and search cluster

// Re-export core types
pub use topicx_core::{
    sparsify_quantize, BetaRow, Document, Error, QuantBudget, RawThetaVector, Result,
    SparseTopicVector, TopicModel,
};

// Re-export schema
pub use topicx_schema::{CorpusConfig, CorpusRegistry, GlobalBudgets, DEFAULT_EXCLUDED_FIELDS};

// Re-export similarity
pub use topicx_similarity::{
    bhattacharyya_coefficient, hellinger_distance, js_divergence, js_similarity, Divergence,
    SimilarityRange, MAX_JS_DIVERGENCE,
};

// Re-export inference
pub use topicx_inference::{InferenceBackend, InferenceOrchestrator};

// Re-export index
pub use topicx_index::{
    InMemoryCluster, IndexOutcome, IndexRecord, IndexingAdapter, ScoredHit, SearchCluster,
    SimilarityQuery,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        bhattacharyya_coefficient, hellinger_distance, js_divergence, js_similarity,
        sparsify_quantize, BetaRow, CorpusConfig, CorpusRegistry, Divergence, Document, Error,
        GlobalBudgets, InMemoryCluster, IndexOutcome, IndexRecord, IndexingAdapter,
        InferenceBackend, InferenceOrchestrator, QuantBudget, RawThetaVector, Result, ScoredHit,
        SearchCluster, SimilarityQuery, SimilarityRange, SparseTopicVector, TopicModel,
        MAX_JS_DIVERGENCE,
    };
}
