use thiserror::Error;

use crate::scoring::ScoringError;

/// Failures inside a rerank pass.
///
/// These never escape [`Reranker::rerank`](super::Reranker::rerank); they are carried on
/// [`RerankOutcome::Degraded`](super::RerankOutcome::Degraded).
#[derive(Debug, Error)]
pub enum RerankError {
    #[error("scoring failed: {0}")]
    Scoring(#[from] ScoringError),

    #[error("scorer returned {actual} scores for {expected} documents")]
    ScoreCountMismatch { expected: usize, actual: usize },

    #[error("scorer returned non-finite score {score} at position {index}")]
    NonFiniteScore { index: usize, score: f32 },
}
