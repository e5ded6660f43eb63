//! Documents and conversation turns exchanged between pipeline stages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::SCORE_METADATA_KEY;

/// Free-form document metadata (and retrieval filters, which share the shape).
pub type Metadata = serde_json::Map<String, Value>;

/// A retrieved passage.
///
/// Stages never mutate a document in place; reranking produces new values via
/// [`Document::with_score`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(alias = "pageContent")]
    pub content: String,

    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns a copy of this document with `score` written into its metadata.
    ///
    /// The stored JSON number is the shortest decimal that reads back as `score`,
    /// so `0.9` serializes as `0.9` rather than its widened `f64` value.
    pub fn with_score(&self, score: f32) -> Self {
        let mut metadata = self.metadata.clone();
        metadata.insert(SCORE_METADATA_KEY.to_string(), score_value(score));
        Self {
            content: self.content.clone(),
            metadata,
        }
    }

    /// Reads back the reranker score, if one was attached.
    pub fn score(&self) -> Option<f32> {
        self.metadata
            .get(SCORE_METADATA_KEY)
            .and_then(Value::as_f64)
            .map(|s| s as f32)
    }
}

fn score_value(score: f32) -> Value {
    let widened = score.to_string().parse::<f64>().unwrap_or(f64::from(score));
    Value::from(widened)
}

/// A document paired with its cross-encoder relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

impl ScoredDocument {
    pub fn new(document: Document, score: f32) -> Self {
        Self { document, score }
    }

    /// Consumes the pair, producing the annotated output document.
    pub fn into_annotated(self) -> Document {
        self.document.with_score(self.score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_score_leaves_original_untouched() {
        let original = Document::new("Paris is the capital of France.").with_metadata("id", 7);

        let scored = original.with_score(0.82);

        assert!(original.score().is_none());
        assert_eq!(original.metadata.len(), 1);
        assert_eq!(scored.metadata.get("id"), Some(&Value::from(7)));
        let score = scored.score().unwrap();
        assert!((score - 0.82).abs() < 1e-6);
    }

    #[test]
    fn test_score_metadata_keeps_f32_decimal() {
        let doc = Document::new("text").with_score(0.9);

        assert_eq!(doc.metadata[SCORE_METADATA_KEY], Value::from(0.9_f64));
        assert_eq!(
            serde_json::to_string(&doc.metadata).unwrap(),
            r#"{"score":0.9}"#
        );
        assert_eq!(doc.score(), Some(0.9));
    }

    #[test]
    fn test_with_score_overwrites_previous_score() {
        let doc = Document::new("text").with_score(0.1).with_score(0.9);
        assert!((doc.score().unwrap() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_document_deserializes_page_content_alias() {
        let doc: Document =
            serde_json::from_str(r#"{"pageContent":"hello","metadata":{"source":"a.pdf"}}"#)
                .unwrap();

        assert_eq!(doc.content, "hello");
        assert_eq!(doc.metadata.get("source"), Some(&Value::from("a.pdf")));
    }

    #[test]
    fn test_document_metadata_defaults_to_empty() {
        let doc: Document = serde_json::from_str(r#"{"content":"hello"}"#).unwrap();
        assert!(doc.metadata.is_empty());
    }

    #[test]
    fn test_scored_document_into_annotated() {
        let annotated = ScoredDocument::new(Document::new("a"), 0.5).into_annotated();
        assert_eq!(annotated.score(), Some(0.5));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatTurn::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
        assert_eq!(Role::User.to_string(), "user");
    }
}
