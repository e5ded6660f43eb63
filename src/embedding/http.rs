use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::Embedder;
use super::error::EmbeddingError;
use crate::config::Config;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
pub(crate) struct EmbedData {
    pub(crate) embedding: Vec<f32>,
    pub(crate) index: usize,
}

/// Client for an OpenAI-compatible embeddings endpoint.
#[derive(Clone)]
pub struct HttpEmbedder {
    http: reqwest::Client,
    url: Url,
    model: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for HttpEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEmbedder")
            .field("url", &self.url.as_str())
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl HttpEmbedder {
    pub fn new(
        url: &str,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, EmbeddingError> {
        let url = Url::parse(url).map_err(|e| EmbeddingError::InvalidConfig {
            reason: format!("invalid embedding url '{url}': {e}"),
        })?;

        Ok(Self {
            http: reqwest::Client::new(),
            url,
            model: model.into(),
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, EmbeddingError> {
        Self::new(
            &config.embedding_url,
            config.embedding_model.clone(),
            config.embedding_api_key.clone(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, texts), fields(model = %self.model, batch = texts.len()))]
    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut request = self.http.post(self.url.clone()).json(&EmbedRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.request_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.request_failed(format!("HTTP status {status}: {body}")));
        }

        let body: EmbedResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        let vectors = order_by_index(body.data, texts.len())?;
        debug!(dimension = vectors.first().map(Vec::len), "Embedded batch");
        Ok(vectors)
    }

    fn request_failed(&self, reason: String) -> EmbeddingError {
        EmbeddingError::RequestFailed {
            url: self.url.to_string(),
            reason,
        }
    }
}

/// Places each embedding at its response `index`; every slot must be filled exactly once.
pub(crate) fn order_by_index(
    data: Vec<EmbedData>,
    expected: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if data.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            actual: data.len(),
        });
    }

    let mut slots: Vec<Option<Vec<f32>>> = vec![None; expected];
    for item in data {
        let Some(slot) = slots.get_mut(item.index) else {
            return Err(EmbeddingError::InvalidResponse {
                reason: format!("embedding index {} out of range", item.index),
            });
        };
        if slot.is_some() {
            return Err(EmbeddingError::InvalidResponse {
                reason: format!("duplicate embedding index {}", item.index),
            });
        }
        *slot = Some(item.embedding);
    }

    Ok(slots.into_iter().flatten().collect())
}

impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts).await
    }
}
