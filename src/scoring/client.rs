use std::collections::HashMap;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::RelevanceScorer;
use super::error::ScoringError;

#[derive(Serialize)]
struct ScoreRequest<'a> {
    query: &'a str,
    documents: &'a [String],
}

#[derive(Deserialize)]
struct ScoredText {
    document: String,
    #[serde(default)]
    score: Option<f32>,
}

/// HTTP client for a cross-encoder scoring service.
///
/// Wire format: `POST {query, documents: [text]}` answered by `[{document, score}]`.
/// Scores are matched back to inputs by exact text; unmatched inputs score `0.0`.
#[derive(Debug, Clone)]
pub struct CrossEncoderClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl CrossEncoderClient {
    pub fn new(endpoint: &str) -> Result<Self, ScoringError> {
        Self::with_http_client(reqwest::Client::new(), endpoint)
    }

    /// Uses a caller-supplied `reqwest::Client` (connection pool, timeouts).
    pub fn with_http_client(http: reqwest::Client, endpoint: &str) -> Result<Self, ScoringError> {
        let endpoint = Url::parse(endpoint).map_err(|e| ScoringError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Scores `texts` against `query`, one score per text in input order.
    ///
    /// Never fails: any error is logged and yields a vector of zeros.
    #[instrument(skip(self, query, texts), fields(endpoint = %self.endpoint, batch = texts.len()))]
    pub async fn score_texts(&self, query: &str, texts: &[String]) -> Vec<f32> {
        if texts.is_empty() {
            return Vec::new();
        }

        match self.request_scores(query, texts).await {
            Ok(by_text) => {
                let scores: Vec<f32> = texts
                    .iter()
                    .map(|text| by_text.get(text.as_str()).copied().unwrap_or(0.0))
                    .collect();

                let matched = texts
                    .iter()
                    .filter(|text| by_text.contains_key(text.as_str()))
                    .count();
                if matched < texts.len() {
                    debug!(
                        matched,
                        requested = texts.len(),
                        "Scoring response missing some documents; defaulting them to 0"
                    );
                }

                scores
            }
            Err(e) => {
                warn!(error = %e, "Scoring request failed; using zero scores");
                vec![0.0; texts.len()]
            }
        }
    }

    async fn request_scores(
        &self,
        query: &str,
        texts: &[String],
    ) -> Result<HashMap<String, f32>, ScoringError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&ScoreRequest {
                query,
                documents: texts,
            })
            .send()
            .await
            .map_err(|e| self.request_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.request_failed(format!("HTTP status {status}")));
        }

        let results: Vec<ScoredText> = response
            .json()
            .await
            .map_err(|e| self.request_failed(format!("invalid response body: {e}")))?;

        Ok(results
            .into_iter()
            .map(|r| (r.document, r.score.unwrap_or(0.0)))
            .collect())
    }

    fn request_failed(&self, reason: String) -> ScoringError {
        ScoringError::RequestFailed {
            endpoint: self.endpoint.to_string(),
            reason,
        }
    }
}

impl RelevanceScorer for CrossEncoderClient {
    async fn score(&self, query: &str, texts: &[String]) -> Result<Vec<f32>, ScoringError> {
        Ok(self.score_texts(query, texts).await)
    }
}
