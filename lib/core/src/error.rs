use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown corpus: {0}")]
    UnknownCorpus(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Invalid budget: {0}")]
    InvalidBudget(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid similarity range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    #[error("Negative weight {weight} at index {index}")]
    NegativeWeight { index: usize, weight: f64 },

    #[error("Malformed topic vector: {0}")]
    MalformedVector(String),

    #[error("Model mismatch: expected {expected}, got {actual}")]
    ModelMismatch { expected: String, actual: String },

    #[error("Document {doc_id} in corpus {corpus} is missing field '{field}'")]
    MissingField {
        corpus: String,
        doc_id: String,
        field: String,
    },

    #[error("Indexing failed for document {doc_id}: {reason}")]
    Indexing { doc_id: String, reason: String },

    #[error("Inference failed for corpus {corpus}, model {model}: {reason}")]
    InferenceFailed {
        corpus: String,
        model: String,
        reason: String,
    },

    #[error("Inference timed out after {millis}ms for corpus {corpus}, model {model}")]
    Timeout {
        corpus: String,
        model: String,
        millis: u64,
    },

    #[error("Batch length mismatch: sent {sent} documents, received {received} vectors")]
    BatchLengthMismatch { sent: usize, received: usize },
}

impl Error {
    /// Whether the caller may retry the same (idempotent) payload.
    ///
    /// Configuration and validation errors are never retryable; the input
    /// has to change first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::InferenceFailed { .. }
                | Error::Timeout { .. }
                | Error::BatchLengthMismatch { .. }
        )
    }
}
