use serde::{Deserialize, Serialize};

use crate::quantize::{sparsify_quantize, QuantBudget};
use crate::{Error, Result};

/// Sparse per-document distribution over the topics of one model.
///
/// Entries are `(topic index, integer weight)` pairs, sorted by ascending
/// topic index with unique indices and strictly positive weights. The vector
/// is immutable once built; re-running inference supersedes it wholesale.
/// An empty vector is a valid terminal state: a document with no salient
/// topic under the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SparseTopicVector {
    model_id: String,
    entries: Vec<(u32, u32)>,
}

impl SparseTopicVector {
    /// Build a vector from `(topic, weight)` pairs.
    ///
    /// Pairs are sorted by topic index; zero weights are dropped. Duplicate
    /// topic indices are rejected.
    pub fn new(model_id: impl Into<String>, mut entries: Vec<(u32, u32)>) -> Result<Self> {
        entries.retain(|&(_, w)| w > 0);
        entries.sort_by_key(|&(topic, _)| topic);
        for pair in entries.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(Error::MalformedVector(format!(
                    "duplicate topic index {}",
                    pair[0].0
                )));
            }
        }
        Ok(Self {
            model_id: model_id.into(),
            entries,
        })
    }

    /// A vector with no salient topics.
    #[inline]
    #[must_use]
    pub fn empty(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            entries: Vec::new(),
        }
    }

    /// Sparsify and quantize a raw theta vector under the given budget.
    pub fn from_raw(
        model_id: impl Into<String>,
        raw: &[f64],
        budget: &QuantBudget,
    ) -> Result<Self> {
        let entries = sparsify_quantize(raw, budget)?;
        Ok(Self {
            model_id: model_id.into(),
            entries,
        })
    }

    #[inline]
    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[(u32, u32)] {
        &self.entries
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all integer weights (the quantization budget, unless empty).
    #[inline]
    #[must_use]
    pub fn sum(&self) -> u64 {
        self.entries.iter().map(|&(_, w)| u64::from(w)).sum()
    }

    /// Weight for a topic, zero when absent.
    #[must_use]
    pub fn weight(&self, topic: u32) -> u32 {
        self.entries
            .binary_search_by_key(&topic, |&(t, _)| t)
            .map(|i| self.entries[i].1)
            .unwrap_or(0)
    }

    /// Wire representation: `t{topic}|{weight}` pairs joined by spaces,
    /// e.g. `"t0|812 t4|188"`. Empty vectors render as the empty string.
    #[must_use]
    pub fn to_repr(&self) -> String {
        let mut out = String::new();
        for (i, &(topic, weight)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push('t');
            out.push_str(&topic.to_string());
            out.push('|');
            out.push_str(&weight.to_string());
        }
        out
    }

    /// Parse the wire representation produced by [`to_repr`](Self::to_repr).
    pub fn parse_repr(model_id: impl Into<String>, repr: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for token in repr.split_whitespace() {
            let rest = token
                .strip_prefix('t')
                .ok_or_else(|| Error::MalformedVector(format!("bad token '{token}'")))?;
            let (topic, weight) = rest
                .split_once('|')
                .ok_or_else(|| Error::MalformedVector(format!("bad token '{token}'")))?;
            let topic: u32 = topic
                .parse()
                .map_err(|_| Error::MalformedVector(format!("bad topic in '{token}'")))?;
            let weight: u32 = weight
                .parse()
                .map_err(|_| Error::MalformedVector(format!("bad weight in '{token}'")))?;
            entries.push((topic, weight));
        }
        Self::new(model_id, entries)
    }
}
