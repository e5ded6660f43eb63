use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest, ChatResponseFormat, JsonSpec};
use serde_json::Value;
use tracing::{debug, instrument};

use super::error::LlmError;
use super::{ChatModel, OutputSchema};
use crate::constants::DEFAULT_TEMPERATURE;
use crate::document::{ChatTurn, Role};

/// [`ChatModel`] backed by a `genai` client.
///
/// The provider is resolved by `genai` from the model name (e.g. `gpt-4o`, `claude-...`);
/// credentials come from the provider's usual environment variable.
#[derive(Clone)]
pub struct GenaiChatModel {
    client: Client,
    model: String,
    options: ChatOptions,
}

impl std::fmt::Debug for GenaiChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiChatModel")
            .field("model", &self.model)
            .finish()
    }
}

impl GenaiChatModel {
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_client(Client::default(), model)
    }

    /// Shares an existing client (and its connection pool) across models.
    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            options: ChatOptions::default().with_temperature(DEFAULT_TEMPERATURE),
        }
    }

    async fn exec(
        &self,
        messages: &[ChatTurn],
        options: &ChatOptions,
    ) -> Result<String, LlmError> {
        let request = ChatRequest::new(messages.iter().map(to_genai_message).collect());

        let response = self
            .client
            .exec_chat(&self.model, request, Some(options))
            .await
            .map_err(|e| LlmError::RequestFailed {
                model: self.model.clone(),
                reason: e.to_string(),
            })?;

        match response.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => Err(LlmError::EmptyResponse {
                model: self.model.clone(),
            }),
        }
    }
}

fn to_genai_message(turn: &ChatTurn) -> ChatMessage {
    match turn.role {
        Role::System => ChatMessage::system(turn.content.clone()),
        Role::User => ChatMessage::user(turn.content.clone()),
        Role::Assistant => ChatMessage::assistant(turn.content.clone()),
    }
}

/// Strips a surrounding Markdown code fence, if present.
pub(crate) fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.trim()
}

impl ChatModel for GenaiChatModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, messages), fields(model = %self.model, messages = messages.len()))]
    async fn invoke(&self, messages: &[ChatTurn]) -> Result<String, LlmError> {
        let text = self.exec(messages, &self.options).await?;
        debug!(response_len = text.len(), "Chat response received");
        Ok(text)
    }

    #[instrument(
        skip(self, messages, schema),
        fields(model = %self.model, schema = %schema.name)
    )]
    async fn invoke_structured(
        &self,
        messages: &[ChatTurn],
        schema: &OutputSchema,
    ) -> Result<Value, LlmError> {
        let options = self
            .options
            .clone()
            .with_response_format(ChatResponseFormat::JsonSpec(JsonSpec::new(
                schema.name.clone(),
                schema.schema.clone(),
            )));

        let text = self.exec(messages, &options).await?;

        serde_json::from_str(strip_code_fence(&text)).map_err(|e| LlmError::InvalidJson {
            model: self.model.clone(),
            reason: e.to_string(),
        })
    }
}
