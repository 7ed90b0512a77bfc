//! The search-cluster collaborator and its in-memory implementation.
//!
//! The cluster is a transactional boundary: `index` stages records, and a
//! `commit` makes all prior writes visible atomically to subsequent reads.
//! Re-indexing a document id replaces the whole prior record, never leaving
//! a mix of old and new fields visible. The [`SearchCluster`] trait keeps
//! the store swappable; [`InMemoryCluster`] is the reference
//! implementation with the scoring extension evaluated per candidate.

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;
use tracing::{debug, info};

use topicx_core::{Error, Result, SparseTopicVector};

use crate::record::{IndexOutcome, IndexRecord, ScoredHit, SimilarityQuery};

pub trait SearchCluster: Send + Sync {
    /// Stage records for indexing; per-record success/failure, a partial
    /// failure never discards the records that succeeded.
    fn index(&self, corpus: &str, records: Vec<IndexRecord>) -> Vec<IndexOutcome>;

    /// Make all staged writes visible atomically to subsequent queries.
    fn commit(&self) -> Result<()>;

    /// Similarity retrieval over the committed records of a corpus,
    /// ordered by descending score.
    fn query(&self, corpus: &str, query: &SimilarityQuery) -> Result<Vec<ScoredHit>>;
}

#[derive(Default)]
struct Shard {
    visible: AHashMap<String, Arc<IndexRecord>>,
    staged: AHashMap<String, Arc<IndexRecord>>,
}

pub struct InMemoryCluster {
    shards: RwLock<AHashMap<String, Shard>>,
    max_payload_bytes: usize,
}

const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1 << 20;

impl InMemoryCluster {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shards: RwLock::new(AHashMap::new()),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }

    #[must_use]
    pub fn with_max_payload_bytes(mut self, bytes: usize) -> Self {
        self.max_payload_bytes = bytes;
        self
    }

    fn validate_record(&self, record: &IndexRecord) -> Result<()> {
        if record.id.is_empty() {
            return Err(Error::Indexing {
                doc_id: String::new(),
                reason: "empty document id".to_string(),
            });
        }
        let payload = serde_json::to_vec(record).map_err(|e| Error::Indexing {
            doc_id: record.id.clone(),
            reason: e.to_string(),
        })?;
        if payload.len() > self.max_payload_bytes {
            return Err(Error::Indexing {
                doc_id: record.id.clone(),
                reason: format!(
                    "payload of {} bytes exceeds limit of {}",
                    payload.len(),
                    self.max_payload_bytes
                ),
            });
        }
        Ok(())
    }

    /// Case-insensitive containment; `needle` must already be lowercased.
    fn text_matches(record: &IndexRecord, needle: &str) -> bool {
        record.fields.values().any(|value| {
            value
                .as_str()
                .is_some_and(|text| text.to_lowercase().contains(needle))
        })
    }
}

impl Default for InMemoryCluster {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchCluster for InMemoryCluster {
    fn index(&self, corpus: &str, records: Vec<IndexRecord>) -> Vec<IndexOutcome> {
        let mut shards = self.shards.write();
        let shard = shards.entry(corpus.to_string()).or_default();

        let mut outcomes = Vec::with_capacity(records.len());
        for record in records {
            match self.validate_record(&record) {
                Ok(()) => {
                    let id = record.id.clone();
                    shard.staged.insert(id.clone(), Arc::new(record));
                    outcomes.push(IndexOutcome::accepted(id));
                }
                Err(error) => {
                    debug!(corpus, doc_id = %record.id, error = %error, "record rejected");
                    outcomes.push(IndexOutcome::failed(record.id, error));
                }
            }
        }
        outcomes
    }

    fn commit(&self) -> Result<()> {
        let mut shards = self.shards.write();
        let mut committed = 0usize;
        for (corpus, shard) in shards.iter_mut() {
            let staged = std::mem::take(&mut shard.staged);
            committed += staged.len();
            for (id, record) in staged {
                // Whole-record replace: queries never see a mix of old and
                // new fields for one id.
                shard.visible.insert(id, record);
            }
            debug!(corpus = %corpus, visible = shard.visible.len(), "shard committed");
        }
        info!(records = committed, "commit complete");
        Ok(())
    }

    fn query(&self, corpus: &str, query: &SimilarityQuery) -> Result<Vec<ScoredHit>> {
        if query.probe.model_id() != query.model_id {
            return Err(Error::ModelMismatch {
                expected: query.model_id.clone(),
                actual: query.probe.model_id().to_string(),
            });
        }

        let shards = self.shards.read();
        let shard = shards
            .get(corpus)
            .ok_or_else(|| Error::UnknownCorpus(corpus.to_string()))?;

        let no_vector = SparseTopicVector::empty(&query.model_id);
        let needle = query.text_filter.as_deref().map(str::to_lowercase);
        let mut hits = Vec::new();
        for record in shard.visible.values() {
            if let Some(needle) = &needle {
                if !Self::text_matches(record, needle) {
                    continue;
                }
            }
            // A document without a vector for this model is the zero
            // distribution: maximum divergence, never an error.
            let stored = record.vectors.get(&query.model_id).unwrap_or(&no_vector);
            let score = query.divergence.similarity(&query.probe, stored)?;
            if let Some(range) = &query.range {
                if !range.contains(score) {
                    continue;
                }
            }
            hits.push(ScoredHit {
                id: record.id.clone(),
                score,
            });
        }

        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.id.cmp(&b.id))
        });
        if let Some(limit) = query.limit {
            hits.truncate(limit);
        }
        Ok(hits)
    }
}
