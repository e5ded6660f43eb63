use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::document::{Document, Metadata};
use crate::vectordb::{VectorDbError, VectorStore};

const MOCK_COLLECTION: &str = "mock";

/// A recorded [`VectorStore::search`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCall {
    pub query: String,
    pub k: usize,
    pub filter: Metadata,
}

#[derive(Debug, Default)]
struct MockState {
    documents: Vec<Document>,
    failing: bool,
    searches: Vec<SearchCall>,
}

/// In-memory [`VectorStore`].
///
/// Insertion order stands in for similarity: `search` returns the first `k` stored documents
/// that satisfy the filter. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockVectorStore {
    state: Arc<RwLock<MockState>>,
}

impl MockVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<Document>) -> Self {
        let store = Self::new();
        store.state.write().documents = documents;
        store
    }

    /// Every subsequent call fails.
    pub fn fail(&self) {
        self.state.write().failing = true;
    }

    pub fn recover(&self) {
        self.state.write().failing = false;
    }

    pub fn document_count(&self) -> usize {
        self.state.read().documents.len()
    }

    pub fn documents(&self) -> Vec<Document> {
        self.state.read().documents.clone()
    }

    pub fn searches(&self) -> Vec<SearchCall> {
        self.state.read().searches.clone()
    }
}

fn matches_filter(document: &Document, filter: &Metadata) -> bool {
    filter.iter().all(|(key, expected)| {
        let actual = document.metadata.get(key);
        match expected {
            Value::Array(options) => actual.is_some_and(|a| options.contains(a)),
            _ => actual == Some(expected),
        }
    })
}

impl VectorStore for MockVectorStore {
    async fn search(
        &self,
        query: &str,
        k: usize,
        filter: &Metadata,
    ) -> Result<Vec<Document>, VectorDbError> {
        let mut state = self.state.write();
        state.searches.push(SearchCall {
            query: query.to_string(),
            k,
            filter: filter.clone(),
        });

        if state.failing {
            return Err(VectorDbError::SearchFailed {
                collection: MOCK_COLLECTION.to_string(),
                message: "mock store set to fail".to_string(),
            });
        }

        Ok(state
            .documents
            .iter()
            .filter(|doc| matches_filter(doc, filter))
            .take(k)
            .cloned()
            .collect())
    }

    async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, VectorDbError> {
        let mut state = self.state.write();
        if state.failing {
            return Err(VectorDbError::UpsertFailed {
                collection: MOCK_COLLECTION.to_string(),
                message: "mock store set to fail".to_string(),
            });
        }

        let count = documents.len();
        state.documents.extend(documents);
        Ok(count)
    }
}
