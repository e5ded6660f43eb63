//! Deterministic embedder for tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::Embedder;
use super::error::EmbeddingError;

/// Derives a fixed-dimension unit vector from the BLAKE3 digest of each text.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimension: usize,
    calls: Arc<AtomicUsize>,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut reader = blake3::Hasher::new()
            .update(text.as_bytes())
            .finalize_xof();
        let mut bytes = vec![0u8; self.dimension];
        reader.fill(&mut bytes);

        let raw: Vec<f32> = bytes.iter().map(|&b| b as f32 / 255.0 - 0.5).collect();
        let norm = raw.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            raw.into_iter().map(|x| x / norm).collect()
        } else {
            raw
        }
    }
}

impl Embedder for MockEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}
