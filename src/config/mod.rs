//! Environment-backed configuration.
//!
//! [`Config`] holds service endpoints plus the environment-level retrieval defaults.
//! Every request resolves its own immutable [`RetrievalConfig`] from a `Config` and a set of
//! call-time [`ConfigOverrides`].

pub mod error;
pub mod retrieval;


pub use error::ConfigError;
pub use retrieval::{ConfigOverrides, RetrievalConfig};

use std::env;

use crate::constants::{
    DEFAULT_COLLECTION_NAME, DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_URL,
    DEFAULT_INITIAL_RETRIEVAL_K, DEFAULT_K, DEFAULT_PROMPT_TEMPLATE, DEFAULT_QDRANT_URL,
    DEFAULT_QUERY_MODEL, DEFAULT_RERANKER_ENDPOINT, DEFAULT_RESPONSE_MODEL,
    DEFAULT_RETRIEVER_PROVIDER,
};
use crate::document::Metadata;

/// Process configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RAGLINE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Collection holding the indexed documents. Default: `documents`.
    pub collection_name: String,

    /// OpenAI-compatible embeddings endpoint.
    pub embedding_url: String,

    pub embedding_model: String,

    /// Bearer token for the embeddings endpoint.
    pub embedding_api_key: Option<String>,

    /// Model used for routing (`provider`-resolvable name understood by `genai`).
    pub query_model: String,

    /// Model used for answer generation.
    pub response_model: String,

    pub retriever_provider: String,

    /// Retrieval filter applied to every search unless overridden.
    pub filter: Metadata,

    pub k: usize,

    pub reranking_enabled: bool,

    /// Over-fetch width used when reranking is enabled. Default: `20`.
    pub initial_retrieval_k: usize,

    /// Final document count. Falls back to the resolved `k` when unset.
    pub final_retrieval_k: Option<usize>,

    pub score_threshold: Option<f32>,

    /// Cross-encoder scoring endpoint. Default: `http://localhost:7000/rerank`.
    pub reranker_endpoint: String,

    pub prompt_template: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            embedding_url: DEFAULT_EMBEDDING_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_api_key: None,
            query_model: DEFAULT_QUERY_MODEL.to_string(),
            response_model: DEFAULT_RESPONSE_MODEL.to_string(),
            retriever_provider: DEFAULT_RETRIEVER_PROVIDER.to_string(),
            filter: Metadata::new(),
            k: DEFAULT_K,
            reranking_enabled: false,
            initial_retrieval_k: DEFAULT_INITIAL_RETRIEVAL_K,
            final_retrieval_k: None,
            score_threshold: None,
            reranker_endpoint: DEFAULT_RERANKER_ENDPOINT.to_string(),
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }
}

impl Config {
    const ENV_QDRANT_URL: &'static str = "RAGLINE_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "RAGLINE_COLLECTION";
    const ENV_EMBEDDING_URL: &'static str = "RAGLINE_EMBEDDING_URL";
    const ENV_EMBEDDING_MODEL: &'static str = "RAGLINE_EMBEDDING_MODEL";
    const ENV_EMBEDDING_API_KEY: &'static str = "RAGLINE_EMBEDDING_API_KEY";
    const ENV_OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    const ENV_QUERY_MODEL: &'static str = "RAGLINE_QUERY_MODEL";
    const ENV_RESPONSE_MODEL: &'static str = "RAGLINE_RESPONSE_MODEL";
    const ENV_RETRIEVER_PROVIDER: &'static str = "RAGLINE_RETRIEVER_PROVIDER";
    const ENV_FILTER: &'static str = "RAGLINE_FILTER";
    const ENV_K: &'static str = "RAGLINE_K";
    const ENV_RERANKING_ENABLED: &'static str = "RAGLINE_RERANKING_ENABLED";
    const ENV_INITIAL_K: &'static str = "RAGLINE_INITIAL_K";
    const ENV_FINAL_K: &'static str = "RAGLINE_FINAL_K";
    const ENV_SCORE_THRESHOLD: &'static str = "RAGLINE_SCORE_THRESHOLD";
    const ENV_RERANKER_URL: &'static str = "RAGLINE_RERANKER_URL";
    const ENV_PROMPT_TEMPLATE: &'static str = "RAGLINE_PROMPT_TEMPLATE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let embedding_api_key = Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_API_KEY)
            .or_else(|| Self::parse_optional_string_from_env(Self::ENV_OPENAI_API_KEY));

        Ok(Self {
            qdrant_url: Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url),
            collection_name: Self::parse_string_from_env(
                Self::ENV_COLLECTION,
                defaults.collection_name,
            ),
            embedding_url: Self::parse_string_from_env(
                Self::ENV_EMBEDDING_URL,
                defaults.embedding_url,
            ),
            embedding_model: Self::parse_string_from_env(
                Self::ENV_EMBEDDING_MODEL,
                defaults.embedding_model,
            ),
            embedding_api_key,
            query_model: Self::parse_string_from_env(Self::ENV_QUERY_MODEL, defaults.query_model),
            response_model: Self::parse_string_from_env(
                Self::ENV_RESPONSE_MODEL,
                defaults.response_model,
            ),
            retriever_provider: Self::parse_string_from_env(
                Self::ENV_RETRIEVER_PROVIDER,
                defaults.retriever_provider,
            ),
            filter: Self::parse_filter_from_env(Self::ENV_FILTER)?.unwrap_or(defaults.filter),
            k: Self::parse_usize_from_env(Self::ENV_K)?.unwrap_or(defaults.k),
            reranking_enabled: Self::parse_bool_from_env(Self::ENV_RERANKING_ENABLED)?
                .unwrap_or(defaults.reranking_enabled),
            initial_retrieval_k: Self::parse_usize_from_env(Self::ENV_INITIAL_K)?
                .unwrap_or(defaults.initial_retrieval_k),
            final_retrieval_k: Self::parse_usize_from_env(Self::ENV_FINAL_K)?,
            score_threshold: Self::parse_f32_from_env(Self::ENV_SCORE_THRESHOLD)?,
            reranker_endpoint: Self::parse_string_from_env(
                Self::ENV_RERANKER_URL,
                defaults.reranker_endpoint,
            ),
            prompt_template: Self::parse_string_from_env(
                Self::ENV_PROMPT_TEMPLATE,
                defaults.prompt_template,
            ),
        })
    }

    /// Validates service settings and the environment-level retrieval defaults.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding_api_key.is_none() && self.embedding_url.contains("api.openai.com") {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_OPENAI_API_KEY,
            });
        }

        RetrievalConfig::resolve(self, &ConfigOverrides::default())?;
        Ok(())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_usize_from_env(var_name: &'static str) -> Result<Option<usize>, ConfigError> {
        match Self::parse_optional_string_from_env(var_name) {
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                    name: var_name,
                    value,
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn parse_f32_from_env(var_name: &'static str) -> Result<Option<f32>, ConfigError> {
        match Self::parse_optional_string_from_env(var_name) {
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|e: std::num::ParseFloatError| ConfigError::InvalidValue {
                    name: var_name,
                    value,
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn parse_bool_from_env(var_name: &'static str) -> Result<Option<bool>, ConfigError> {
        match Self::parse_optional_string_from_env(var_name) {
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Some(true)),
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                _ => Err(ConfigError::InvalidValue {
                    name: var_name,
                    value,
                    reason: "expected a boolean".to_string(),
                }),
            },
            None => Ok(None),
        }
    }

    fn parse_filter_from_env(var_name: &'static str) -> Result<Option<Metadata>, ConfigError> {
        match Self::parse_optional_string_from_env(var_name) {
            Some(value) => serde_json::from_str::<Metadata>(&value)
                .map(Some)
                .map_err(|e| ConfigError::InvalidValue {
                    name: var_name,
                    value,
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }
}
