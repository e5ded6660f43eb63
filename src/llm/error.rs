use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("chat request to '{model}' failed: {reason}")]
    RequestFailed { model: String, reason: String },

    #[error("'{model}' returned an empty response")]
    EmptyResponse { model: String },

    #[error("'{model}' returned invalid JSON: {reason}")]
    InvalidJson { model: String, reason: String },
}
