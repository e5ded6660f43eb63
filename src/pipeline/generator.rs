use tracing::{debug, info, instrument};

use super::error::GenerationError;
use crate::constants::{
    CONTEXT_PLACEHOLDER, CONTEXT_SEPARATOR, NO_CONTEXT_RESPONSE, QUESTION_PLACEHOLDER,
};
use crate::document::{ChatTurn, Document};
use crate::llm::ChatModel;

/// Produces the assistant reply, grounded or direct.
#[derive(Debug, Clone)]
pub struct AnswerGenerator<M> {
    model: M,
}

impl<M: ChatModel> AnswerGenerator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Invokes the model with the bare query.
    #[instrument(skip(self, query), fields(model = self.model.model_name(), query_len = query.len()))]
    pub async fn answer_directly(&self, query: &str) -> Result<String, GenerationError> {
        let answer = self.model.invoke(&[ChatTurn::user(query)]).await?;
        debug!(answer_len = answer.len(), "Direct answer generated");
        Ok(answer)
    }

    /// Fills `template` with the documents and query and invokes the model once.
    ///
    /// With no documents, returns [`NO_CONTEXT_RESPONSE`] without calling the model.
    #[instrument(
        skip(self, query, documents, template),
        fields(model = self.model.model_name(), documents = documents.len())
    )]
    pub async fn generate(
        &self,
        query: &str,
        documents: &[Document],
        template: &str,
    ) -> Result<String, GenerationError> {
        if documents.is_empty() {
            info!("No documents available; returning fallback response");
            return Ok(NO_CONTEXT_RESPONSE.to_string());
        }

        let context = build_context(documents);
        let prompt = render_prompt(template, &context, query);
        debug!(
            context_len = context.len(),
            prompt_len = prompt.len(),
            "Invoking model with retrieved context"
        );

        let answer = self.model.invoke(&[ChatTurn::user(prompt)]).await?;
        debug!(answer_len = answer.len(), "Answer generated");
        Ok(answer)
    }
}

/// Document contents joined by [`CONTEXT_SEPARATOR`], in order.
pub fn build_context(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|doc| doc.content.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Substitutes every `{context}` and `{question}` in `template`.
///
/// Single pass: placeholder text inside the substituted values is left alone.
pub fn render_prompt(template: &str, context: &str, question: &str) -> String {
    let mut out = String::with_capacity(template.len() + context.len() + question.len());
    let mut rest = template;

    loop {
        let next = [
            (CONTEXT_PLACEHOLDER, context),
            (QUESTION_PLACEHOLDER, question),
        ]
        .into_iter()
        .filter_map(|(placeholder, value)| {
            rest.find(placeholder).map(|at| (at, placeholder, value))
        })
        .min_by_key(|(at, _, _)| *at);

        match next {
            Some((at, placeholder, value)) => {
                out.push_str(&rest[..at]);
                out.push_str(value);
                rest = &rest[at + placeholder.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}
