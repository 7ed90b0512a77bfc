use std::sync::Arc;
use std::time::Duration;

use ahash::AHashMap;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use topicx_core::{Error, Result, SparseTopicVector};
use topicx_schema::GlobalBudgets;

use crate::backend::InferenceBackend;

/// Batches documents through an [`InferenceBackend`] and quantizes the raw
/// thetas it returns.
///
/// Runs for the same (corpus, model) pair are serialized through a keyed
/// lock: a second request for an active pair queues behind the first,
/// unrelated pairs run fully in parallel. Each external call is bounded by
/// the configured timeout. A mid-batch failure invalidates the whole run
/// with a retryable error and surfaces no partial vectors. Cancelling the
/// caller (dropping the future) abandons the in-flight call and releases
/// the pair lock; no work continues on behalf of a cancelled caller.
pub struct InferenceOrchestrator {
    backend: Arc<dyn InferenceBackend>,
    budgets: GlobalBudgets,
    timeout: Duration,
    locks: Mutex<AHashMap<(String, String), Arc<tokio::sync::Mutex<()>>>>,
}

impl InferenceOrchestrator {
    /// Budgets are validated here, before any request is accepted.
    pub fn new(
        backend: Arc<dyn InferenceBackend>,
        budgets: GlobalBudgets,
        timeout: Duration,
    ) -> Result<Self> {
        budgets.validate()?;
        Ok(Self {
            backend,
            budgets,
            timeout,
            locks: Mutex::new(AHashMap::new()),
        })
    }

    #[inline]
    #[must_use]
    pub fn budgets(&self) -> &GlobalBudgets {
        &self.budgets
    }

    fn pair_lock(&self, corpus_id: &str, model_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock();
        locks
            .entry((corpus_id.to_string(), model_id.to_string()))
            .or_default()
            .clone()
    }

    /// Infer quantized theta vectors for a batch of document bodies.
    ///
    /// The input is split into `ceil(len / batch_size)` backend calls (never
    /// one call per document, to amortize the backend's fixed startup cost)
    /// and the result has exactly one vector per input document, in input
    /// order.
    pub async fn infer_thetas(
        &self,
        corpus_id: &str,
        model_id: &str,
        documents: &[String],
    ) -> Result<Vec<SparseTopicVector>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let lock = self.pair_lock(corpus_id, model_id);
        let result = {
            let _guard = lock.lock().await;
            self.run_batches(corpus_id, model_id, documents).await
        };
        drop(lock);
        // Entries without a holder or waiter would otherwise accumulate one
        // per (corpus, model) pair ever seen.
        self.locks.lock().retain(|_, l| Arc::strong_count(l) > 1);
        result
    }

    async fn run_batches(
        &self,
        corpus_id: &str,
        model_id: &str,
        documents: &[String],
    ) -> Result<Vec<SparseTopicVector>> {
        let batch_size = self.budgets.batch_size;
        let budget = self.budgets.theta_budget();
        let batches = documents.len().div_ceil(batch_size);
        info!(
            corpus = corpus_id,
            model = model_id,
            documents = documents.len(),
            batches,
            "running inference"
        );

        let mut thetas = Vec::with_capacity(documents.len());
        for (batch_no, chunk) in documents.chunks(batch_size).enumerate() {
            debug!(
                corpus = corpus_id,
                model = model_id,
                batch = batch_no,
                size = chunk.len(),
                "dispatching inference batch"
            );
            let raw = tokio::time::timeout(
                self.timeout,
                self.backend.infer(corpus_id, model_id, chunk),
            )
            .await
            .map_err(|_| Error::Timeout {
                corpus: corpus_id.to_string(),
                model: model_id.to_string(),
                millis: self.timeout.as_millis() as u64,
            })
            .and_then(|r| r)
            .map_err(|e| {
                warn!(
                    corpus = corpus_id,
                    model = model_id,
                    batch = batch_no,
                    error = %e,
                    "inference batch failed, invalidating run"
                );
                e
            })?;

            if raw.len() != chunk.len() {
                return Err(Error::BatchLengthMismatch {
                    sent: chunk.len(),
                    received: raw.len(),
                });
            }
            for weights in &raw {
                thetas.push(SparseTopicVector::from_raw(model_id, weights, &budget)?);
            }
        }
        Ok(thetas)
    }
}
