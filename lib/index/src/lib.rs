//! # TopicX Index
//!
//! Indexing adapter and search-cluster integration.
//!
//! [`IndexingAdapter`] turns corpus rows and quantized theta vectors into
//! schema-filtered [`IndexRecord`]s; a [`SearchCluster`] stages them,
//! commits them atomically, and answers similarity queries scored with the
//! divergence extension. [`InMemoryCluster`] is the bundled cluster
//! implementation.

pub mod adapter;
pub mod cluster;
pub mod record;

pub use adapter::IndexingAdapter;
pub use cluster::{InMemoryCluster, SearchCluster};
pub use record::{IndexOutcome, IndexRecord, ScoredHit, SimilarityQuery};
