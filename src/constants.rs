//! Cross-cutting, shared constants.
//!
//! Defaults here are the bottom layer of configuration resolution: call-time overrides win
//! over `RAGLINE_*` environment values, which win over these.

pub const DEFAULT_RETRIEVER_PROVIDER: &str = "qdrant";

pub const SUPPORTED_RETRIEVER_PROVIDERS: &[&str] = &[DEFAULT_RETRIEVER_PROVIDER];

pub const DEFAULT_K: usize = 5;

pub const DEFAULT_INITIAL_RETRIEVAL_K: usize = 20;

pub const DEFAULT_RERANKER_ENDPOINT: &str = "http://localhost:7000/rerank";

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

pub const DEFAULT_COLLECTION_NAME: &str = "documents";

pub const DEFAULT_EMBEDDING_URL: &str = "https://api.openai.com/v1/embeddings";

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

pub const DEFAULT_QUERY_MODEL: &str = "gpt-4o";

pub const DEFAULT_RESPONSE_MODEL: &str = "gpt-4o";

pub const DEFAULT_TEMPERATURE: f64 = 0.2;

/// Number of leading characters used for cache keys and deduplication.
///
/// Documents that agree on their first `CONTENT_PREFIX_CHARS` characters are treated as the
/// same document by the reranker. This is a known limitation, kept for parity with the
/// scores already cached under this scheme.
pub const CONTENT_PREFIX_CHARS: usize = 100;

/// Metadata key the reranker writes the relevance score into.
pub const SCORE_METADATA_KEY: &str = "score";

/// Separator between document contents when assembling generation context.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Answer returned when generation has no documents to ground on.
pub const NO_CONTEXT_RESPONSE: &str =
    "I don't have any specific information about that. Could you ask me something else?";

pub const DEFAULT_PROMPT_TEMPLATE: &str = "You are an assistant for question-answering tasks.
Use the following pieces of retrieved context to answer the question.
If you don't know the answer, just say that you don't know.
Use three sentences maximum and keep the answer concise.

Question: {question}

Context: {context}

Answer:";

pub const CONTEXT_PLACEHOLDER: &str = "{context}";

pub const QUESTION_PLACEHOLDER: &str = "{question}";
