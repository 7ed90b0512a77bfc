use async_trait::async_trait;
use topicx_core::{RawThetaVector, Result};

/// Pluggable inference seam: batch of document bodies in, one raw theta
/// vector per document out, in input order.
///
/// The trainer/sampler behind this trait (Mallet-style Gibbs sampler,
/// neural variational model, remote service) is external to this core and
/// swappable without touching the orchestrator. Implementations must be
/// idempotent per batch: the same input batch deterministically reproduces
/// the same output, so a retried batch is safe to repeat verbatim.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn infer(
        &self,
        corpus_id: &str,
        model_id: &str,
        documents: &[String],
    ) -> Result<Vec<RawThetaVector>>;
}
