use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("scoring request to '{endpoint}' failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("invalid scoring endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("scorer unavailable: {reason}")]
    Unavailable { reason: String },
}
