use serde::{Deserialize, Serialize};

use crate::quantize::{sparsify_quantize, QuantBudget};
use crate::{Error, Result};

/// Sparse per-topic distribution over vocabulary terms, quantized under the
/// betas budget. Same shape as a theta vector, but indices are term ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BetaRow {
    topic: u32,
    entries: Vec<(u32, u32)>,
}

impl BetaRow {
    #[inline]
    #[must_use]
    pub fn topic(&self) -> u32 {
        self.topic
    }

    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[(u32, u32)] {
        &self.entries
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn sum(&self) -> u64 {
        self.entries.iter().map(|&(_, w)| u64::from(w)).sum()
    }
}

/// A trained topic model: identifier, topic count and the quantized
/// topic-term matrix. Training happens outside this core; a model is
/// immutable once constructed from the trainer's raw output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicModel {
    id: String,
    num_topics: usize,
    betas: Vec<BetaRow>,
}

impl TopicModel {
    /// Build a model from the trainer's raw beta matrix, one row per topic,
    /// quantizing each row under the betas budget.
    pub fn from_raw_betas(
        id: impl Into<String>,
        raw_rows: &[Vec<f64>],
        budget: &QuantBudget,
    ) -> Result<Self> {
        let id = id.into();
        if raw_rows.is_empty() {
            return Err(Error::UnknownModel(format!("model {id} has no topics")));
        }
        let mut betas = Vec::with_capacity(raw_rows.len());
        for (topic, row) in raw_rows.iter().enumerate() {
            let entries = sparsify_quantize(row, budget)?;
            betas.push(BetaRow {
                topic: topic as u32,
                entries,
            });
        }
        Ok(Self {
            num_topics: betas.len(),
            id,
            betas,
        })
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn num_topics(&self) -> usize {
        self.num_topics
    }

    #[inline]
    #[must_use]
    pub fn beta_rows(&self) -> &[BetaRow] {
        &self.betas
    }

    #[must_use]
    pub fn beta_row(&self, topic: u32) -> Option<&BetaRow> {
        self.betas.get(topic as usize)
    }
}
