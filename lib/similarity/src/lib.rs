//! # TopicX Similarity
//!
//! Query-time distributional scoring for sparse topic vectors.
//!
//! The engine-facing contract is a pure function `(probe, candidate) ->
//! score` plus a separate range predicate, so the scoring extension can be
//! unit-tested and reused without a cluster runtime:
//!
//! - [`js_divergence`] / [`js_similarity`] - Jensen-Shannon divergence and
//!   its `1 - d/ln 2` similarity transform (the default scoring extension)
//! - [`hellinger_distance`] / [`bhattacharyya_coefficient`] - alternative
//!   measures over the same sparse representation
//! - [`Divergence`] - measure selector yielding a `[0, 1]` similarity
//! - [`SimilarityRange`] - inclusive score interval for range retrieval
//!
//! ## Example
//!
//! ```rust
//! use topicx_core::SparseTopicVector;
//! use topicx_similarity::{js_similarity, SimilarityRange};
//!
//! let probe = SparseTopicVector::new("mallet-25", vec![(4, 1000)]).unwrap();
//! let same = SparseTopicVector::new("mallet-25", vec![(4, 1000)]).unwrap();
//!
//! let score = js_similarity(&probe, &same).unwrap();
//! assert!((score - 1.0).abs() < 1e-12);
//! assert!(SimilarityRange::new(0.9, 1.0).unwrap().contains(score));
//! ```

pub mod divergence;
pub mod range;

pub use divergence::{
    bhattacharyya_coefficient, hellinger_distance, js_divergence, js_similarity, Divergence,
    MAX_JS_DIVERGENCE,
};
pub use range::SimilarityRange;
