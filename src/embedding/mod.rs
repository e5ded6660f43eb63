//! Text embedding for the vector store.
//!
//! - [`Embedder`] is the async seam the vector store embeds through.
//! - [`HttpEmbedder`] speaks the OpenAI-compatible `/v1/embeddings` protocol.

mod error;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use error::EmbeddingError;
pub use http::HttpEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;

use std::future::Future;

/// Batch text embedding.
pub trait Embedder: Send + Sync {
    /// Returns one vector per input text, in input order.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send;

    /// Embeds a single query string.
    fn embed_query(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<f32>, EmbeddingError>> + Send {
        let texts = vec![text.to_string()];
        async move {
            let mut vectors = self.embed(&texts).await?;
            match vectors.len() {
                1 => Ok(vectors.remove(0)),
                actual => Err(EmbeddingError::CountMismatch {
                    expected: 1,
                    actual,
                }),
            }
        }
    }
}
