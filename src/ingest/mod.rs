//! Document ingestion into the vector store.

pub mod error;


pub use error::IngestError;

use std::path::Path;

use tracing::{info, instrument, warn};

use crate::document::Document;
use crate::vectordb::VectorStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub indexed: usize,
    pub skipped_blank: usize,
}

#[derive(Debug, Clone)]
pub struct Ingestor<V> {
    store: V,
}

impl<V: VectorStore> Ingestor<V> {
    pub fn new(store: V) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &V {
        &self.store
    }

    /// Indexes every document with non-blank content.
    #[instrument(skip(self, documents), fields(input = documents.len()))]
    pub async fn ingest(&self, documents: Vec<Document>) -> Result<IngestReport, IngestError> {
        let total = documents.len();
        let documents: Vec<Document> = documents
            .into_iter()
            .filter(|doc| !doc.content.trim().is_empty())
            .collect();
        let skipped_blank = total - documents.len();

        if skipped_blank > 0 {
            warn!(skipped_blank, "Dropping documents with blank content");
        }
        if documents.is_empty() {
            return Err(IngestError::NoDocuments);
        }

        let indexed = self.store.add_documents(documents).await?;
        info!(indexed, "Documents indexed");

        Ok(IngestReport {
            indexed,
            skipped_blank,
        })
    }
}

/// Reads a JSON array of `{"pageContent" | "content", "metadata"}` objects.
pub fn load_documents(path: impl AsRef<Path>) -> Result<Vec<Document>, IngestError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| IngestError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    serde_json::from_str(&raw).map_err(|e| IngestError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
