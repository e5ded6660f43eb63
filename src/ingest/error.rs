use std::path::PathBuf;

use thiserror::Error;

use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("no documents to index")]
    NoDocuments,

    #[error("vector store error: {0}")]
    Store(#[from] VectorDbError),

    #[error("failed to read {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },

    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
}
