use thiserror::Error;

use crate::llm::LlmError;

/// Query classification failures. Always fatal for the request.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("classification call failed: {0}")]
    Model(#[from] LlmError),

    #[error("classifier returned unknown route '{value}'")]
    InvalidRoute { value: String },

    #[error("malformed classification response: {reason}")]
    MalformedResponse { reason: String },
}
