//! Query classification: answer directly, or retrieve first.

pub mod error;


pub use error::ClassificationError;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::document::ChatTurn;
use crate::llm::{ChatModel, OutputSchema};

pub const ROUTER_SYSTEM_PROMPT: &str = "You are a routing assistant. Your job is to decide \
whether a question needs document retrieval or can be answered directly.

Respond with either:
'retrieve' - if answering requires looking up documents
'direct' - if the question can be answered directly, together with your direct answer";

const ROUTE_SCHEMA_NAME: &str = "route_decision";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Direct,
    Retrieve,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Direct => "direct",
            Route::Retrieve => "retrieve",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = ClassificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(Route::Direct),
            "retrieve" => Ok(Route::Retrieve),
            other => Err(ClassificationError::InvalidRoute {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    pub route: Route,
    /// Inline answer the classifier may offer alongside `direct`.
    pub direct_answer: Option<String>,
}

impl RouteDecision {
    /// Parses `{"route": "...", "directAnswer": "..."}`.
    pub fn from_json(value: &Value) -> Result<Self, ClassificationError> {
        let route = value
            .get("route")
            .ok_or_else(|| ClassificationError::MalformedResponse {
                reason: "missing 'route' field".to_string(),
            })?
            .as_str()
            .ok_or_else(|| ClassificationError::MalformedResponse {
                reason: "'route' is not a string".to_string(),
            })?
            .parse()?;

        let direct_answer = value
            .get("directAnswer")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            route,
            direct_answer,
        })
    }
}

/// JSON schema the classifier's structured output must follow.
pub fn route_schema() -> OutputSchema {
    OutputSchema::new(
        ROUTE_SCHEMA_NAME,
        json!({
            "type": "object",
            "properties": {
                "route": { "type": "string", "enum": ["retrieve", "direct"] },
                "directAnswer": { "type": "string" }
            },
            "required": ["route"],
            "additionalProperties": false
        }),
    )
}

/// Classifies queries with a structured call to `M`. No retries, no caching.
#[derive(Debug, Clone)]
pub struct QueryRouter<M> {
    model: M,
    schema: OutputSchema,
}

impl<M: ChatModel> QueryRouter<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            schema: route_schema(),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    #[instrument(
        skip(self, query),
        fields(model = self.model.model_name(), query_len = query.len())
    )]
    pub async fn classify(&self, query: &str) -> Result<RouteDecision, ClassificationError> {
        let messages = [ChatTurn::system(ROUTER_SYSTEM_PROMPT), ChatTurn::user(query)];

        let response = self
            .model
            .invoke_structured(&messages, &self.schema)
            .await?;
        let decision = RouteDecision::from_json(&response)?;

        debug!(
            route = decision.route.as_str(),
            inline_answer = decision.direct_answer.is_some(),
            "Query classified"
        );
        Ok(decision)
    }
}
