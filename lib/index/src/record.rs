use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use topicx_core::{Error, SparseTopicVector};
use topicx_similarity::{Divergence, SimilarityRange};

/// One indexed document: resolved identifier, the schema-filtered metadata
/// fields, and one sparse topic vector per model that has been applied to
/// the document, keyed by model id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    pub id: String,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub vectors: HashMap<String, SparseTopicVector>,
}

/// Per-record indexing outcome. A batch partially fails without discarding
/// the records that succeeded.
#[derive(Debug)]
pub struct IndexOutcome {
    pub id: String,
    pub error: Option<Error>,
}

impl IndexOutcome {
    #[inline]
    #[must_use]
    pub fn accepted(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            error: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn failed(id: impl Into<String>, error: Error) -> Self {
        Self {
            id: id.into(),
            error: Some(error),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// A query hit: document identifier plus its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredHit {
    pub id: String,
    pub score: f64,
}

/// Similarity retrieval request: a probe vector for one model, optionally
/// AND-composed with a text filter, a score range and a result limit.
#[derive(Debug, Clone)]
pub struct SimilarityQuery {
    pub model_id: String,
    pub probe: SparseTopicVector,
    pub text_filter: Option<String>,
    pub range: Option<SimilarityRange>,
    pub limit: Option<usize>,
    pub divergence: Divergence,
}

impl SimilarityQuery {
    #[must_use]
    pub fn new(model_id: impl Into<String>, probe: SparseTopicVector) -> Self {
        Self {
            model_id: model_id.into(),
            probe,
            text_filter: None,
            range: None,
            limit: None,
            divergence: Divergence::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_text_filter(mut self, needle: impl Into<String>) -> Self {
        self.text_filter = Some(needle.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_range(mut self, range: SimilarityRange) -> Self {
        self.range = Some(range);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_divergence(mut self, divergence: Divergence) -> Self {
        self.divergence = divergence;
        self
    }
}
