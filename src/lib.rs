//! Ragline library crate (used by the CLI and integration tests).
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`RagOrchestrator`], [`RagOutput`], [`RagError`] - Request orchestration
//! - [`QueryRouter`], [`Route`], [`RouteDecision`] - Query classification
//! - [`Retriever`] - Over-fetch vector retrieval
//! - [`Reranker`], [`RerankOptions`], [`RerankOutcome`] - Cross-encoder reranking
//! - [`AnswerGenerator`] - Grounded and direct answer generation
//!
//! ## Configuration
//! - [`Config`], [`ConfigOverrides`], [`RetrievalConfig`], [`ConfigError`]
//!
//! ## Collaborators
//! - [`ChatModel`] / [`GenaiChatModel`] - Chat completion
//! - [`VectorStore`] / [`QdrantStore`] - Similarity search and indexing
//! - [`Embedder`] / [`HttpEmbedder`] - Text embeddings
//! - [`RelevanceScorer`] / [`CrossEncoderClient`], [`ScoreCache`] - Relevance scoring
//!
//! ## Ingestion
//! - [`Ingestor`], [`load_documents`]
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod document;
pub mod embedding;
pub mod hashing;
pub mod ingest;
pub mod llm;
pub mod pipeline;
pub mod rerank;
pub mod retrieval;
pub mod routing;
pub mod scoring;
pub mod vectordb;

pub use config::{Config, ConfigError, ConfigOverrides, RetrievalConfig};
pub use document::{ChatTurn, Document, Metadata, Role, ScoredDocument};
pub use embedding::{Embedder, EmbeddingError, HttpEmbedder};
pub use hashing::{content_prefix, hash_content_prefix, score_cache_key};
pub use ingest::{IngestError, IngestReport, Ingestor, load_documents};
pub use llm::{ChatModel, GenaiChatModel, LlmError, OutputSchema};
pub use pipeline::{AnswerGenerator, GenerationError, RagError, RagOrchestrator, RagOutput, Stage};
pub use rerank::{RerankError, RerankOptions, RerankOutcome, RerankStatus, Reranker, SkipReason};
pub use retrieval::{RetrievalError, Retriever};
pub use routing::{ClassificationError, QueryRouter, Route, RouteDecision};
pub use scoring::{CrossEncoderClient, RelevanceScorer, ScoreCache, ScoringError};
pub use vectordb::{QdrantStore, VectorDbError, VectorStore};

#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use llm::MockChatModel;
#[cfg(any(test, feature = "mock"))]
pub use scoring::MockScorer;
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorStore;
