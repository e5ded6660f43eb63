use thiserror::Error;

use crate::config::ConfigError;
use crate::llm::LlmError;
use crate::routing::ClassificationError;

/// Answer generation failures, direct answers included.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation call failed: {0}")]
    Model(#[from] LlmError),
}

/// Errors that abort a pipeline run.
///
/// Retrieval and reranking failures never appear here: they are absorbed and reported on
/// [`RagOutput`](super::RagOutput) instead.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("classification error: {0}")]
    Classification(#[from] ClassificationError),

    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
}
