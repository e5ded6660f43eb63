use chrono::Utc;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::VectorStore;
use super::error::VectorDbError;
use super::model::{build_filter, document_from_point, document_payload};
use crate::config::Config;
use crate::document::{Document, Metadata};
use crate::embedding::{Embedder, EmbeddingError};

/// Qdrant-backed [`VectorStore`] that embeds text with `E`.
///
/// Points carry `content`, `metadata` and `ingested_at` payload fields. Filters match on
/// `metadata.<key>`.
#[derive(Clone)]
pub struct QdrantStore<E> {
    client: Qdrant,
    url: String,
    collection: String,
    embedder: E,
}

impl<E> std::fmt::Debug for QdrantStore<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantStore")
            .field("url", &self.url)
            .field("collection", &self.collection)
            .finish()
    }
}

impl<E: Embedder> QdrantStore<E> {
    /// Creates a store for `collection` at `url`. Does not contact the server.
    pub fn new(
        url: &str,
        collection: impl Into<String>,
        embedder: E,
    ) -> Result<Self, VectorDbError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorDbError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.into(),
            embedder,
        })
    }

    pub fn from_config(config: &Config, embedder: E) -> Result<Self, VectorDbError> {
        Self::new(&config.qdrant_url, config.collection_name.clone(), embedder)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Ensures the collection exists, creating it with cosine distance if missing.
    pub async fn ensure_collection(&self, vector_size: u64) -> Result<(), VectorDbError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| self.create_failed(e.to_string()))?;

        if !exists {
            info!(
                collection = %self.collection,
                vector_size,
                "Creating collection"
            );
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection)
                        .vectors_config(VectorParamsBuilder::new(vector_size, Distance::Cosine)),
                )
                .await
                .map_err(|e| self.create_failed(e.to_string()))?;
        }

        Ok(())
    }

    #[instrument(
        skip(self, query, filter),
        fields(collection = %self.collection, filter_keys = filter.len())
    )]
    async fn search_documents(
        &self,
        query: &str,
        k: usize,
        filter: &Metadata,
    ) -> Result<Vec<Document>, VectorDbError> {
        let condition = build_filter(filter)?;
        let vector = self.embedder.embed_query(query).await?;

        let mut search = SearchPointsBuilder::new(&self.collection, vector, k as u64)
            .with_payload(true);
        if let Some(condition) = condition {
            search = search.filter(condition);
        }

        let response =
            self.client
                .search_points(search)
                .await
                .map_err(|e| VectorDbError::SearchFailed {
                    collection: self.collection.clone(),
                    message: e.to_string(),
                })?;

        let hits = response.result.len();
        let documents: Vec<Document> = response
            .result
            .into_iter()
            .filter_map(document_from_point)
            .collect();

        if documents.len() < hits {
            debug!(
                hits,
                usable = documents.len(),
                "Skipped points without string content"
            );
        }

        Ok(documents)
    }

    #[instrument(
        skip(self, documents),
        fields(collection = %self.collection, count = documents.len())
    )]
    async fn write_documents(&self, documents: Vec<Document>) -> Result<usize, VectorDbError> {
        if documents.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
        let vectors = self.embedder.embed(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: vectors.len(),
            }
            .into());
        }

        let dimension = vectors.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(VectorDbError::InvalidDimension {
                expected: dimension,
                actual: bad.len(),
            });
        }

        self.ensure_collection(dimension as u64).await?;

        let ingested_at = Utc::now().to_rfc3339();
        let points: Vec<PointStruct> = documents
            .into_iter()
            .zip(vectors)
            .map(|(doc, vector)| {
                PointStruct::new(
                    Uuid::new_v4().to_string(),
                    vector,
                    document_payload(doc, &ingested_at),
                )
            })
            .collect();
        let count = points.len();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| VectorDbError::UpsertFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        info!(count, "Indexed documents");
        Ok(count)
    }

    fn create_failed(&self, message: String) -> VectorDbError {
        VectorDbError::CreateCollectionFailed {
            collection: self.collection.clone(),
            message,
        }
    }
}

impl<E: Embedder> VectorStore for QdrantStore<E> {
    async fn search(
        &self,
        query: &str,
        k: usize,
        filter: &Metadata,
    ) -> Result<Vec<Document>, VectorDbError> {
        self.search_documents(query, k, filter).await
    }

    async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, VectorDbError> {
        self.write_documents(documents).await
    }
}
