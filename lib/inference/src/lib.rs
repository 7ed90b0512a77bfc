//! # TopicX Inference
//!
//! Batching orchestrator in front of a pluggable topic-model inference
//! backend.
//!
//! The external sampler is reached only through the [`InferenceBackend`]
//! trait: a batch of document bodies goes in, one raw theta vector per
//! document comes out. The [`InferenceOrchestrator`] owns everything around
//! that call: splitting requests into `batch_size` chunks, serializing runs
//! per (corpus, model) pair, enforcing the call timeout, invalidating a run
//! on mid-batch failure, and quantizing raw thetas under the configured
//! budget.

pub mod backend;
pub mod orchestrator;

pub use backend::InferenceBackend;
pub use orchestrator::InferenceOrchestrator;
