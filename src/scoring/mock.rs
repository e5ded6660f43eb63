//! Deterministic in-process scorer for tests.

use std::sync::Arc;

use parking_lot::Mutex;

use super::RelevanceScorer;
use super::error::ScoringError;

type ScoreFn = dyn Fn(&str, &str) -> f32 + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Failing,
    /// Returns one score fewer than requested.
    ShortBatch,
}

#[derive(Debug, Default)]
struct Calls {
    batches: Vec<Vec<String>>,
}

/// Scores (query, text) pairs with a closure and records every batch it receives.
///
/// Clones share the call log, so a test can keep a handle after moving the scorer into a
/// reranker.
#[derive(Clone)]
pub struct MockScorer {
    score_fn: Arc<ScoreFn>,
    mode: Arc<Mutex<Mode>>,
    calls: Arc<Mutex<Calls>>,
}

impl std::fmt::Debug for MockScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockScorer")
            .field("mode", &*self.mode.lock())
            .field("batches", &self.calls.lock().batches.len())
            .finish()
    }
}

impl MockScorer {
    pub fn new<F>(score_fn: F) -> Self
    where
        F: Fn(&str, &str) -> f32 + Send + Sync + 'static,
    {
        Self {
            score_fn: Arc::new(score_fn),
            mode: Arc::new(Mutex::new(Mode::Normal)),
            calls: Arc::new(Mutex::new(Calls::default())),
        }
    }

    /// Scores every text with the same value.
    pub fn constant(score: f32) -> Self {
        Self::new(move |_, _| score)
    }

    /// Scores by the first matching substring in `rules`, else `fallback`.
    pub fn keyword(rules: Vec<(&'static str, f32)>, fallback: f32) -> Self {
        Self::new(move |_, text| {
            rules
                .iter()
                .find(|(needle, _)| text.contains(needle))
                .map(|(_, score)| *score)
                .unwrap_or(fallback)
        })
    }

    /// Every subsequent batch returns [`ScoringError::Unavailable`].
    pub fn fail(&self) {
        *self.mode.lock() = Mode::Failing;
    }

    /// Every subsequent batch returns one score fewer than requested.
    pub fn short_batches(&self) {
        *self.mode.lock() = Mode::ShortBatch;
    }

    pub fn recover(&self) {
        *self.mode.lock() = Mode::Normal;
    }

    pub fn batch_count(&self) -> usize {
        self.calls.lock().batches.len()
    }

    /// Texts of every batch received, in call order.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.calls.lock().batches.clone()
    }

    pub fn scored_text_count(&self) -> usize {
        self.calls.lock().batches.iter().map(Vec::len).sum()
    }
}

impl RelevanceScorer for MockScorer {
    async fn score(&self, query: &str, texts: &[String]) -> Result<Vec<f32>, ScoringError> {
        self.calls.lock().batches.push(texts.to_vec());

        let mode = *self.mode.lock();
        match mode {
            Mode::Failing => Err(ScoringError::Unavailable {
                reason: "mock scorer set to fail".to_string(),
            }),
            Mode::Normal => Ok(texts
                .iter()
                .map(|text| (self.score_fn)(query, text))
                .collect()),
            Mode::ShortBatch => Ok(texts
                .iter()
                .skip(1)
                .map(|text| (self.score_fn)(query, text))
                .collect()),
        }
    }
}
