use serde::{Deserialize, Serialize};
use topicx_core::{Error, Result};

/// Inclusive similarity-score interval for range retrieval.
///
/// Applies to the similarity score, not the raw divergence, and composes
/// with ordinary text-match filtering as a logical AND.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SimilarityRange {
    pub min: f64,
    pub max: f64,
}

impl SimilarityRange {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(Error::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Both bounds are inclusive.
    #[inline]
    #[must_use]
    pub fn contains(&self, score: f64) -> bool {
        score >= self.min && score <= self.max
    }
}
