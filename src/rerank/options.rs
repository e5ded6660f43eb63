use crate::config::RetrievalConfig;

/// Per-call rerank settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RerankOptions {
    pub enabled: bool,
    pub final_k: usize,
    /// Inclusive lower bound on scores kept, applied before truncation.
    pub score_threshold: Option<f32>,
}

impl RerankOptions {
    pub fn new(final_k: usize) -> Self {
        Self {
            enabled: true,
            final_k,
            score_threshold: None,
        }
    }

    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self {
            enabled: config.reranking_enabled,
            final_k: config.final_retrieval_k,
            score_threshold: config.score_threshold,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = Some(threshold);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}
