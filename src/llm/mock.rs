//! Scripted chat model for tests.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};

use super::error::LlmError;
use super::{ChatModel, OutputSchema};
use crate::document::{ChatTurn, Role};

const MOCK_MODEL: &str = "mock-model";

#[derive(Debug)]
struct MockState {
    structured: Value,
    answer: Option<String>,
    fail_invoke: bool,
    fail_structured: bool,
    invocations: Vec<Vec<ChatTurn>>,
    structured_invocations: Vec<Vec<ChatTurn>>,
}

/// [`ChatModel`] returning canned replies and recording every call.
///
/// By default the structured reply is `{"route": "retrieve"}` and text replies echo the last
/// user message as `"answer: <content>"`. Clones share state.
#[derive(Debug, Clone)]
pub struct MockChatModel {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockChatModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChatModel {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                structured: json!({ "route": "retrieve" }),
                answer: None,
                fail_invoke: false,
                fail_structured: false,
                invocations: Vec::new(),
                structured_invocations: Vec::new(),
            })),
        }
    }

    /// Structured calls return `{"route": route}`.
    pub fn with_route(self, route: &str) -> Self {
        self.with_structured(json!({ "route": route }))
    }

    pub fn with_structured(self, value: Value) -> Self {
        self.state.lock().structured = value;
        self
    }

    pub fn with_answer(self, answer: impl Into<String>) -> Self {
        self.state.lock().answer = Some(answer.into());
        self
    }

    pub fn fail_invoke(&self) {
        self.state.lock().fail_invoke = true;
    }

    pub fn fail_structured(&self) {
        self.state.lock().fail_structured = true;
    }

    pub fn invocations(&self) -> Vec<Vec<ChatTurn>> {
        self.state.lock().invocations.clone()
    }

    pub fn structured_invocations(&self) -> Vec<Vec<ChatTurn>> {
        self.state.lock().structured_invocations.clone()
    }

    pub fn invoke_count(&self) -> usize {
        self.state.lock().invocations.len()
    }

    pub fn structured_count(&self) -> usize {
        self.state.lock().structured_invocations.len()
    }

    fn failure() -> LlmError {
        LlmError::RequestFailed {
            model: MOCK_MODEL.to_string(),
            reason: "mock model set to fail".to_string(),
        }
    }
}

impl ChatModel for MockChatModel {
    fn model_name(&self) -> &str {
        MOCK_MODEL
    }

    async fn invoke(&self, messages: &[ChatTurn]) -> Result<String, LlmError> {
        let mut state = self.state.lock();
        state.invocations.push(messages.to_vec());

        if state.fail_invoke {
            return Err(Self::failure());
        }

        if let Some(answer) = &state.answer {
            return Ok(answer.clone());
        }

        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        Ok(format!("answer: {last_user}"))
    }

    async fn invoke_structured(
        &self,
        messages: &[ChatTurn],
        _schema: &OutputSchema,
    ) -> Result<Value, LlmError> {
        let mut state = self.state.lock();
        state.structured_invocations.push(messages.to_vec());

        if state.fail_structured {
            return Err(Self::failure());
        }

        Ok(state.structured.clone())
    }
}
