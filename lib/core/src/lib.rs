//! # TopicX Core
//!
//! Core library for the TopicX topic-vector search engine.
//!
//! This crate provides the fundamental data structures and algorithms:
//!
//! - [`SparseTopicVector`] - Sparse integer document-topic distribution
//! - [`QuantBudget`] / [`sparsify_quantize`] - Budgeted sparsification and quantization
//! - [`TopicModel`] / [`BetaRow`] - Trained model with a quantized topic-term matrix
//! - [`Document`] - Raw document with metadata
//!
//! ## Example
//!
//! ```rust
//! use topicx_core::{QuantBudget, SparseTopicVector};
//!
//! // A raw theta vector from the trainer, quantized to sum exactly 1000
//! let budget = QuantBudget::new(3e-3, 1000).unwrap();
//! let theta = SparseTopicVector::from_raw("mallet-25", &[0.72, 0.001, 0.28], &budget).unwrap();
//!
//! assert_eq!(theta.sum(), 1000);
//! assert_eq!(theta.weight(1), 0); // below threshold, dropped
//! assert_eq!(theta.to_repr(), "t0|720 t2|280");
//! ```

pub mod document;
pub mod error;
pub mod model;
pub mod quantize;
pub mod sparse;

pub use document::Document;
pub use error::{Error, Result};
pub use model::{BetaRow, TopicModel};
pub use quantize::{sparsify_quantize, QuantBudget};
pub use sparse::SparseTopicVector;

/// Raw per-document topic weights as produced by an inference backend,
/// dense over the model's topic space.
pub type RawThetaVector = Vec<f64>;
