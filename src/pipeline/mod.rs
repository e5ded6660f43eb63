//! End-to-end request orchestration.
//!
//! A run moves through [`Stage`]s:
//!
//! ```text
//! Start -> Routing -> DirectAnswer ----------------------------------> End
//!                  -> Retrieving -> Reranking (if enabled) -> Generating -> End
//! ```
//!
//! Configuration is resolved before the first network call. Retrieval and rerank failures
//! are absorbed; classification and generation failures abort the run.

pub mod error;
pub mod generator;


pub use error::{GenerationError, RagError};
pub use generator::{AnswerGenerator, build_context, render_prompt};

use tracing::{debug, info, instrument, warn};

use crate::config::{Config, ConfigOverrides, RetrievalConfig};
use crate::document::{ChatTurn, Document};
use crate::llm::ChatModel;
use crate::rerank::{RerankOptions, RerankStatus, Reranker};
use crate::retrieval::Retriever;
use crate::routing::{QueryRouter, Route};
use crate::scoring::{CrossEncoderClient, RelevanceScorer};
use crate::vectordb::VectorStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Routing,
    DirectAnswer,
    Retrieving,
    Reranking,
    Generating,
    End,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::Routing => "routing",
            Stage::DirectAnswer => "direct_answer",
            Stage::Retrieving => "retrieving",
            Stage::Reranking => "reranking",
            Stage::Generating => "generating",
            Stage::End => "end",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RagOutput {
    /// Input history followed by the new (user, assistant) pair.
    pub messages: Vec<ChatTurn>,
    /// Documents the answer was grounded on. Empty on the direct route.
    pub documents: Vec<Document>,
    pub route: Route,
    /// `None` when reranking was not configured for the request or the route was direct.
    pub rerank: Option<RerankStatus>,
    /// The vector store failed and generation ran without documents.
    pub retrieval_failed: bool,
}

impl RagOutput {
    /// The assistant reply appended by this run.
    pub fn answer(&self) -> &str {
        self.messages
            .last()
            .map(|turn| turn.content.as_str())
            .unwrap_or_default()
    }
}

/// Sequences routing, retrieval, reranking and generation for a request.
///
/// Collaborators are injected at construction. The reranker, and with it the score cache,
/// lives as long as the orchestrator.
#[derive(Debug)]
pub struct RagOrchestrator<M, V, S = CrossEncoderClient> {
    config: Config,
    router: QueryRouter<M>,
    retriever: Retriever<V>,
    reranker: Reranker<S>,
    generator: AnswerGenerator<M>,
}

impl<M, V, S> RagOrchestrator<M, V, S>
where
    M: ChatModel,
    V: VectorStore,
    S: RelevanceScorer,
{
    /// `query_model` only classifies. `response_model` writes every answer,
    /// including direct answers on the [`Route::Direct`] path.
    pub fn new(
        config: Config,
        query_model: M,
        response_model: M,
        store: V,
        reranker: Reranker<S>,
    ) -> Self {
        Self {
            config,
            router: QueryRouter::new(query_model),
            retriever: Retriever::new(store),
            reranker,
            generator: AnswerGenerator::new(response_model),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn reranker(&self) -> &Reranker<S> {
        &self.reranker
    }

    pub fn retriever(&self) -> &Retriever<V> {
        &self.retriever
    }

    pub async fn run(&self, query: &str, history: &[ChatTurn]) -> Result<RagOutput, RagError> {
        self.run_with_overrides(query, history, &ConfigOverrides::default())
            .await
    }

    #[instrument(skip_all, fields(query_len = query.len(), history = history.len()))]
    pub async fn run_with_overrides(
        &self,
        query: &str,
        history: &[ChatTurn],
        overrides: &ConfigOverrides,
    ) -> Result<RagOutput, RagError> {
        debug!(stage = %Stage::Start, "Pipeline started");
        let config = RetrievalConfig::resolve(&self.config, overrides)?;

        if config.reranking_enabled && config.reranker_endpoint != self.config.reranker_endpoint {
            info!(
                endpoint = %config.reranker_endpoint,
                "Per-request reranker endpoint set; scoring with the configured client"
            );
        }

        debug!(stage = %Stage::Routing, "Classifying query");
        let decision = self.router.classify(query).await?;
        info!(stage = %Stage::Routing, route = %decision.route, "Query routed");

        let output = match decision.route {
            Route::Direct => {
                debug!(stage = %Stage::DirectAnswer, "Answering without retrieval");
                let answer = self.generator.answer_directly(query).await?;
                RagOutput {
                    messages: extend_history(history, query, answer),
                    documents: Vec::new(),
                    route: Route::Direct,
                    rerank: None,
                    retrieval_failed: false,
                }
            }
            Route::Retrieve => self.retrieve_and_answer(query, history, &config).await?,
        };

        debug!(
            stage = %Stage::End,
            route = %output.route,
            documents = output.documents.len(),
            "Pipeline finished"
        );
        Ok(output)
    }

    async fn retrieve_and_answer(
        &self,
        query: &str,
        history: &[ChatTurn],
        config: &RetrievalConfig,
    ) -> Result<RagOutput, RagError> {
        debug!(stage = %Stage::Retrieving, fetch_k = config.fetch_k(), "Retrieving documents");
        let (documents, retrieval_failed) = match self.retriever.retrieve(query, config).await {
            Ok(documents) => (documents, false),
            Err(e) => {
                warn!(
                    stage = %Stage::Retrieving,
                    error = %e,
                    "Retrieval failed; continuing without documents"
                );
                (Vec::new(), true)
            }
        };

        let (documents, rerank) = if config.reranking_enabled {
            debug!(stage = %Stage::Reranking, candidates = documents.len(), "Reranking");
            let outcome = self
                .reranker
                .rerank(query, documents, &RerankOptions::from_config(config))
                .await;
            let status = outcome.status();
            (outcome.into_documents(), Some(status))
        } else {
            (documents, None)
        };

        debug!(stage = %Stage::Generating, documents = documents.len(), "Generating answer");
        let answer = self
            .generator
            .generate(query, &documents, &config.prompt_template)
            .await?;

        Ok(RagOutput {
            messages: extend_history(history, query, answer),
            documents,
            route: Route::Retrieve,
            rerank,
            retrieval_failed,
        })
    }
}

fn extend_history(history: &[ChatTurn], query: &str, answer: String) -> Vec<ChatTurn> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.extend_from_slice(history);
    messages.push(ChatTurn::user(query));
    messages.push(ChatTurn::assistant(answer));
    messages
}
