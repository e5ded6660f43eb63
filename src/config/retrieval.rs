use tracing::warn;

use super::{Config, ConfigError};
use crate::constants::{CONTEXT_PLACEHOLDER, QUESTION_PLACEHOLDER, SUPPORTED_RETRIEVER_PROVIDERS};
use crate::document::Metadata;

/// Call-time overrides. `None` fields fall through to the environment-level [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub retriever_provider: Option<String>,
    pub filter: Option<Metadata>,
    pub k: Option<usize>,
    pub reranking_enabled: Option<bool>,
    pub initial_retrieval_k: Option<usize>,
    pub final_retrieval_k: Option<usize>,
    pub score_threshold: Option<f32>,
    pub reranker_endpoint: Option<String>,
    pub prompt_template: Option<String>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retriever_provider(mut self, provider: impl Into<String>) -> Self {
        self.retriever_provider = Some(provider.into());
        self
    }

    pub fn filter(mut self, filter: Metadata) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    pub fn reranking_enabled(mut self, enabled: bool) -> Self {
        self.reranking_enabled = Some(enabled);
        self
    }

    pub fn initial_retrieval_k(mut self, k: usize) -> Self {
        self.initial_retrieval_k = Some(k);
        self
    }

    pub fn final_retrieval_k(mut self, k: usize) -> Self {
        self.final_retrieval_k = Some(k);
        self
    }

    pub fn score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = Some(threshold);
        self
    }

    pub fn reranker_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.reranker_endpoint = Some(endpoint.into());
        self
    }

    pub fn prompt_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = Some(template.into());
        self
    }
}

/// Immutable per-request retrieval settings.
///
/// Built by [`RetrievalConfig::resolve`]: overrides > environment > hardcoded defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalConfig {
    pub retriever_provider: String,
    pub filter: Metadata,
    pub k: usize,
    pub reranking_enabled: bool,
    pub initial_retrieval_k: usize,
    pub final_retrieval_k: usize,
    pub score_threshold: Option<f32>,
    pub reranker_endpoint: String,
    pub prompt_template: String,
}

impl RetrievalConfig {
    /// Merges `overrides` over `defaults` and validates the result.
    ///
    /// `final_retrieval_k` falls back to the resolved `k` when neither layer sets it.
    pub fn resolve(defaults: &Config, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let k = overrides.k.unwrap_or(defaults.k);

        let config = Self {
            retriever_provider: overrides
                .retriever_provider
                .clone()
                .unwrap_or_else(|| defaults.retriever_provider.clone()),
            filter: overrides
                .filter
                .clone()
                .unwrap_or_else(|| defaults.filter.clone()),
            k,
            reranking_enabled: overrides
                .reranking_enabled
                .unwrap_or(defaults.reranking_enabled),
            initial_retrieval_k: overrides
                .initial_retrieval_k
                .unwrap_or(defaults.initial_retrieval_k),
            final_retrieval_k: overrides
                .final_retrieval_k
                .or(defaults.final_retrieval_k)
                .unwrap_or(k),
            score_threshold: overrides.score_threshold.or(defaults.score_threshold),
            reranker_endpoint: overrides
                .reranker_endpoint
                .clone()
                .unwrap_or_else(|| defaults.reranker_endpoint.clone()),
            prompt_template: overrides
                .prompt_template
                .clone()
                .unwrap_or_else(|| defaults.prompt_template.clone()),
        };

        config.validate()?;

        if config.reranking_enabled && config.initial_retrieval_k < config.final_retrieval_k {
            warn!(
                initial_retrieval_k = config.initial_retrieval_k,
                final_retrieval_k = config.final_retrieval_k,
                "Over-fetch width below final count; fetching final_retrieval_k instead"
            );
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SUPPORTED_RETRIEVER_PROVIDERS.contains(&self.retriever_provider.as_str()) {
            return Err(ConfigError::UnsupportedProvider {
                provider: self.retriever_provider.clone(),
            });
        }

        for (name, value) in [
            ("k", self.k),
            ("initial_retrieval_k", self.initial_retrieval_k),
            ("final_retrieval_k", self.final_retrieval_k),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroCount { name, value });
            }
        }

        if let Some(threshold) = self.score_threshold
            && !threshold.is_finite()
        {
            return Err(ConfigError::InvalidThreshold { value: threshold });
        }

        if self.reranking_enabled {
            reqwest::Url::parse(&self.reranker_endpoint).map_err(|e| {
                ConfigError::InvalidEndpoint {
                    endpoint: self.reranker_endpoint.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        for placeholder in [CONTEXT_PLACEHOLDER, QUESTION_PLACEHOLDER] {
            if !self.prompt_template.contains(placeholder) {
                return Err(ConfigError::InvalidPromptTemplate { placeholder });
            }
        }

        Ok(())
    }

    /// Number of candidates to request from the vector store.
    ///
    /// With reranking enabled this is the over-fetch width, clamped so it never drops below
    /// `final_retrieval_k`.
    pub fn fetch_k(&self) -> usize {
        if self.reranking_enabled {
            self.initial_retrieval_k.max(self.final_retrieval_k)
        } else {
            self.final_retrieval_k
        }
    }
}
