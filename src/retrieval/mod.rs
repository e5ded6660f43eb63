//! First-stage vector retrieval.

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::config::RetrievalConfig;
use crate::document::Document;
use crate::vectordb::{VectorDbError, VectorStore};

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("vector store error: {0}")]
    Store(#[from] VectorDbError),
}

/// Runs similarity search with the fetch width the request's config calls for.
#[derive(Debug, Clone)]
pub struct Retriever<V> {
    store: V,
}

impl<V: VectorStore> Retriever<V> {
    pub fn new(store: V) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &V {
        &self.store
    }

    /// Fetches [`RetrievalConfig::fetch_k`] candidates in store order.
    ///
    /// Without reranking, anything past `final_retrieval_k` is dropped here since no later
    /// stage will truncate it.
    #[instrument(
        skip(self, query, config),
        fields(
            query_len = query.len(),
            fetch_k = config.fetch_k(),
            reranking = config.reranking_enabled,
        )
    )]
    pub async fn retrieve(
        &self,
        query: &str,
        config: &RetrievalConfig,
    ) -> Result<Vec<Document>, RetrievalError> {
        let fetch_k = config.fetch_k();
        let mut documents = self.store.search(query, fetch_k, &config.filter).await?;

        if documents.is_empty() {
            info!("No documents found for query");
            return Ok(documents);
        }

        if !config.reranking_enabled && documents.len() > config.final_retrieval_k {
            debug!(
                returned = documents.len(),
                limit = config.final_retrieval_k,
                "Truncating results to final limit"
            );
            documents.truncate(config.final_retrieval_k);
        }

        debug!(count = documents.len(), "Retrieved documents");
        Ok(documents)
    }
}
