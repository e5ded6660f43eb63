//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading or resolving configuration.
///
/// All of these are fatal and surface before any network call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {name}: '{value}' ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A required environment variable was not set.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    /// The retriever provider is not one this crate knows how to build.
    #[error("unsupported retriever provider: {provider}")]
    UnsupportedProvider { provider: String },

    /// A retrieval count was zero.
    #[error("{name} must be at least 1, got {value}")]
    ZeroCount { name: &'static str, value: usize },

    /// Score threshold was NaN or infinite.
    #[error("score threshold must be finite, got {value}")]
    InvalidThreshold { value: f32 },

    /// The reranker endpoint is not a usable URL.
    #[error("invalid reranker endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The prompt template is missing a placeholder the generator fills.
    #[error("prompt template is missing the {placeholder} placeholder")]
    InvalidPromptTemplate { placeholder: &'static str },
}
