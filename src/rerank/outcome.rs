use crate::document::Document;

use super::error::RerankError;

/// Why a rerank pass returned its input untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    EmptyInput,
    NoScorer,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Disabled => "disabled",
            SkipReason::EmptyInput => "empty_input",
            SkipReason::NoScorer => "no_scorer",
        }
    }
}

/// Result of [`Reranker::rerank`](super::Reranker::rerank).
#[derive(Debug)]
pub enum RerankOutcome {
    /// Input returned unchanged.
    Skipped {
        documents: Vec<Document>,
        reason: SkipReason,
    },

    /// Deduplicated, scored, sorted, filtered and truncated. Each document carries `score`.
    Reranked {
        documents: Vec<Document>,
        /// Unique documents scored (cache hits included).
        scored: usize,
        cache_hits: usize,
    },

    /// Scoring failed; input order truncated to `final_k`, without scores.
    Degraded {
        documents: Vec<Document>,
        error: RerankError,
    },
}

impl RerankOutcome {
    pub fn documents(&self) -> &[Document] {
        match self {
            RerankOutcome::Skipped { documents, .. }
            | RerankOutcome::Reranked { documents, .. }
            | RerankOutcome::Degraded { documents, .. } => documents,
        }
    }

    pub fn into_documents(self) -> Vec<Document> {
        match self {
            RerankOutcome::Skipped { documents, .. }
            | RerankOutcome::Reranked { documents, .. }
            | RerankOutcome::Degraded { documents, .. } => documents,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, RerankOutcome::Degraded { .. })
    }

    pub fn status(&self) -> RerankStatus {
        match self {
            RerankOutcome::Skipped { reason, .. } => RerankStatus::Skipped(*reason),
            RerankOutcome::Reranked {
                scored, cache_hits, ..
            } => RerankStatus::Reranked {
                scored: *scored,
                cache_hits: *cache_hits,
            },
            RerankOutcome::Degraded { error, .. } => RerankStatus::Degraded {
                reason: error.to_string(),
            },
        }
    }
}

/// Document-free summary of a [`RerankOutcome`], reported on pipeline output.
#[derive(Debug, Clone, PartialEq)]
pub enum RerankStatus {
    Skipped(SkipReason),
    Reranked { scored: usize, cache_hits: usize },
    Degraded { reason: String },
}
