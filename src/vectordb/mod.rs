//! Vector store access.
//!
//! [`VectorStore`] is the seam retrieval and ingestion go through. [`QdrantStore`] is the
//! production implementation; [`MockVectorStore`] is an in-memory stand-in for tests.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;

#[cfg(test)]
mod tests;

pub use client::QdrantStore;
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockVectorStore, SearchCall};
pub use model::build_filter;

use std::future::Future;

use crate::document::{Document, Metadata};

/// Similarity search and document writes.
pub trait VectorStore: Send + Sync {
    /// Returns up to `k` documents most similar to `query`, most similar first.
    ///
    /// Every key in `filter` must equal the document's metadata value. Zero matches is an
    /// empty vec, not an error.
    fn search(
        &self,
        query: &str,
        k: usize,
        filter: &Metadata,
    ) -> impl Future<Output = Result<Vec<Document>, VectorDbError>> + Send;

    /// Indexes `documents`, returning how many were written.
    fn add_documents(
        &self,
        documents: Vec<Document>,
    ) -> impl Future<Output = Result<usize, VectorDbError>> + Send;
}
