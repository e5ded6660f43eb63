//! Cross-encoder relevance scoring.
//!
//! [`RelevanceScorer`] is the seam the reranker scores through. The production implementation
//! is [`CrossEncoderClient`], an HTTP adapter for a batch scoring service; [`ScoreCache`]
//! memoizes its results per (query, content prefix).
//!
//! # Failure Policy
//!
//! The HTTP client never fails a batch: transport errors, non-success statuses and
//! undecodable bodies all produce an all-zero score vector. Errors in [`ScoringError`] exist
//! for implementations that do surface failures (the mock, or alternative backends); the
//! reranker absorbs them either way.

pub mod cache;
pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use cache::ScoreCache;
pub use client::CrossEncoderClient;
pub use error::ScoringError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockScorer;

use std::future::Future;

/// Batch relevance scoring for (query, text) pairs.
pub trait RelevanceScorer: Send + Sync {
    /// Returns one score per entry of `texts`, in the same order.
    fn score(
        &self,
        query: &str,
        texts: &[String],
    ) -> impl Future<Output = Result<Vec<f32>, ScoringError>> + Send;
}
