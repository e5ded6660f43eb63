//! Second-stage reranking of over-fetched candidates.
//!
//! [`Reranker::rerank`] runs, in order:
//!
//! 1. skip checks (disabled, empty input, no scorer): input returned unchanged
//! 2. dedup by content-prefix digest, first occurrence wins
//! 3. cache lookup; one batch call to the scorer for the misses only
//! 4. stable sort by score, descending
//! 5. threshold filter (`score >= threshold`)
//! 6. truncation to `final_k`
//! 7. `score` written into a copy of each document's metadata
//!
//! A failure anywhere in 3 degrades to the input order truncated to `final_k`. The caller
//! sees which path ran through [`RerankOutcome`].

pub mod error;
pub mod options;
pub mod outcome;


pub use error::RerankError;
pub use options::RerankOptions;
pub use outcome::{RerankOutcome, RerankStatus, SkipReason};

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, info, instrument, warn};

use crate::document::{Document, ScoredDocument};
use crate::hashing::hash_content_prefix;
use crate::scoring::{CrossEncoderClient, RelevanceScorer, ScoreCache};

/// Caching cross-encoder reranker.
///
/// Owns its [`ScoreCache`]; a new instance starts cold.
#[derive(Debug)]
pub struct Reranker<S = CrossEncoderClient> {
    scorer: Option<S>,
    cache: ScoreCache,
}

struct Scored {
    documents: Vec<ScoredDocument>,
    cache_hits: usize,
}

impl<S: RelevanceScorer> Reranker<S> {
    pub fn new(scorer: S) -> Self {
        Self {
            scorer: Some(scorer),
            cache: ScoreCache::new(),
        }
    }

    /// A reranker that always skips with [`SkipReason::NoScorer`].
    pub fn without_scorer() -> Self {
        Self {
            scorer: None,
            cache: ScoreCache::new(),
        }
    }

    pub fn cache(&self) -> &ScoreCache {
        &self.cache
    }

    pub fn has_scorer(&self) -> bool {
        self.scorer.is_some()
    }

    #[instrument(
        skip(self, query, documents),
        fields(
            query_len = query.len(),
            input = documents.len(),
            final_k = options.final_k,
            threshold = ?options.score_threshold,
        )
    )]
    pub async fn rerank(
        &self,
        query: &str,
        documents: Vec<Document>,
        options: &RerankOptions,
    ) -> RerankOutcome {
        let scorer = match &self.scorer {
            _ if !options.enabled => return skipped(documents, SkipReason::Disabled),
            _ if documents.is_empty() => return skipped(documents, SkipReason::EmptyInput),
            None => return skipped(documents, SkipReason::NoScorer),
            Some(scorer) => scorer,
        };

        match self.score_unique(scorer, query, &documents).await {
            Ok(scored) => {
                let unique = scored.documents.len();
                let cache_hits = scored.cache_hits;
                let ranked = rank(scored.documents, options);

                info!(
                    unique,
                    cache_hits,
                    output = ranked.len(),
                    top_score = ranked.first().and_then(Document::score),
                    "Reranking complete"
                );

                RerankOutcome::Reranked {
                    documents: ranked,
                    scored: unique,
                    cache_hits,
                }
            }
            Err(error) => {
                warn!(error = %error, "Reranking failed; falling back to retrieval order");
                let mut documents = documents;
                documents.truncate(options.final_k);
                RerankOutcome::Degraded { documents, error }
            }
        }
    }

    /// Dedups `documents` and scores each unique one, cache first.
    async fn score_unique(
        &self,
        scorer: &S,
        query: &str,
        documents: &[Document],
    ) -> Result<Scored, RerankError> {
        let unique = dedup_by_prefix(documents);
        if unique.len() < documents.len() {
            debug!(
                before = documents.len(),
                after = unique.len(),
                "Removed duplicate documents"
            );
        }

        let mut scores: Vec<Option<f32>> = unique
            .iter()
            .map(|doc| self.cache.get(query, &doc.content))
            .collect();

        let misses: Vec<usize> = scores
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.is_none().then_some(i))
            .collect();
        let cache_hits = unique.len() - misses.len();

        if !misses.is_empty() {
            let texts: Vec<String> = misses
                .iter()
                .map(|&i| unique[i].content.clone())
                .collect();

            debug!(batch = texts.len(), cache_hits, "Scoring cache misses");
            let fresh = scorer.score(query, &texts).await?;

            if fresh.len() != texts.len() {
                return Err(RerankError::ScoreCountMismatch {
                    expected: texts.len(),
                    actual: fresh.len(),
                });
            }
            if let Some((index, &score)) = fresh.iter().enumerate().find(|(_, s)| !s.is_finite())
            {
                return Err(RerankError::NonFiniteScore { index, score });
            }

            for (&i, score) in misses.iter().zip(fresh) {
                self.cache.insert(query, &unique[i].content, score);
                scores[i] = Some(score);
            }
        } else {
            debug!(cache_hits, "All documents served from score cache");
        }

        let documents = unique
            .into_iter()
            .zip(scores)
            .map(|(doc, score)| ScoredDocument::new(doc.clone(), score.unwrap_or(0.0)))
            .collect();

        Ok(Scored {
            documents,
            cache_hits,
        })
    }
}

fn skipped(documents: Vec<Document>, reason: SkipReason) -> RerankOutcome {
    debug!(reason = reason.as_str(), "Reranking skipped");
    RerankOutcome::Skipped { documents, reason }
}

/// First occurrence per content-prefix digest, in input order.
fn dedup_by_prefix(documents: &[Document]) -> Vec<&Document> {
    let mut seen = HashSet::with_capacity(documents.len());
    documents
        .iter()
        .filter(|doc| seen.insert(hash_content_prefix(&doc.content)))
        .collect()
}

/// Sort, threshold, truncate and annotate.
fn rank(mut scored: Vec<ScoredDocument>, options: &RerankOptions) -> Vec<Document> {
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    if scored.len() > 1 && scored.iter().all(|s| s.score == scored[0].score) {
        warn!(
            score = scored[0].score,
            documents = scored.len(),
            "All documents received the same score"
        );
    }

    if let Some(threshold) = options.score_threshold {
        let before = scored.len();
        scored.retain(|s| s.score >= threshold);
        debug!(
            threshold,
            before,
            after = scored.len(),
            "Applied score threshold"
        );
    }

    scored.truncate(options.final_k);
    scored
        .into_iter()
        .map(ScoredDocument::into_annotated)
        .collect()
}
