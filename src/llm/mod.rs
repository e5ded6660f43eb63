//! Chat model access.
//!
//! [`ChatModel`] is the seam routing and generation call through; [`GenaiChatModel`] binds
//! it to a provider via `genai`.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::GenaiChatModel;
pub use error::LlmError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockChatModel;

use std::future::Future;

use serde_json::Value;

use crate::document::ChatTurn;

/// Named JSON schema for structured output.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Value,
}

impl OutputSchema {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

pub trait ChatModel: Send + Sync {
    fn model_name(&self) -> &str;

    /// Returns the assistant's text reply.
    fn invoke(
        &self,
        messages: &[ChatTurn],
    ) -> impl Future<Output = Result<String, LlmError>> + Send;

    /// Returns a JSON value constrained by `schema`.
    fn invoke_structured(
        &self,
        messages: &[ChatTurn],
        schema: &OutputSchema,
    ) -> impl Future<Output = Result<Value, LlmError>> + Send;
}
