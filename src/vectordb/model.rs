//! Conversions between documents and Qdrant payloads.

use std::collections::HashMap;

use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{Condition, Filter, ListValue, ScoredPoint, Struct, Value};
use serde_json::Value as JsonValue;

use super::VectorDbError;
use crate::document::{Document, Metadata};

/// Payload field holding the document text.
pub const CONTENT_FIELD: &str = "content";

/// Payload field holding the document metadata object.
pub const METADATA_FIELD: &str = "metadata";

/// Payload field recording when the point was written (RFC 3339).
pub const INGESTED_AT_FIELD: &str = "ingested_at";

pub fn json_to_qdrant(value: JsonValue) -> Value {
    let kind = match value {
        JsonValue::Null => Kind::NullValue(0),
        JsonValue::Bool(b) => Kind::BoolValue(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Kind::IntegerValue(i),
            None => Kind::DoubleValue(n.as_f64().unwrap_or(0.0)),
        },
        JsonValue::String(s) => Kind::StringValue(s),
        JsonValue::Array(items) => Kind::ListValue(ListValue {
            values: items.into_iter().map(json_to_qdrant).collect(),
        }),
        JsonValue::Object(map) => Kind::StructValue(Struct {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, json_to_qdrant(v)))
                .collect(),
        }),
    };

    Value { kind: Some(kind) }
}

pub fn qdrant_to_json(value: Value) -> JsonValue {
    match value.kind {
        None | Some(Kind::NullValue(_)) => JsonValue::Null,
        Some(Kind::BoolValue(b)) => JsonValue::Bool(b),
        Some(Kind::IntegerValue(i)) => JsonValue::from(i),
        Some(Kind::DoubleValue(d)) => serde_json::Number::from_f64(d)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Some(Kind::StringValue(s)) => JsonValue::String(s),
        Some(Kind::ListValue(list)) => {
            JsonValue::Array(list.values.into_iter().map(qdrant_to_json).collect())
        }
        Some(Kind::StructValue(s)) => JsonValue::Object(
            s.fields
                .into_iter()
                .map(|(k, v)| (k, qdrant_to_json(v)))
                .collect(),
        ),
    }
}

/// Builds the point payload for `document`.
pub fn document_payload(document: Document, ingested_at: &str) -> HashMap<String, Value> {
    let mut payload = HashMap::with_capacity(3);
    payload.insert(CONTENT_FIELD.to_string(), document.content.into());
    payload.insert(
        METADATA_FIELD.to_string(),
        json_to_qdrant(JsonValue::Object(document.metadata)),
    );
    payload.insert(INGESTED_AT_FIELD.to_string(), ingested_at.to_string().into());
    payload
}

/// Recovers a document from a search hit. Points without a string `content` are skipped.
pub fn document_from_point(point: ScoredPoint) -> Option<Document> {
    let mut payload = point.payload;

    let content = match payload.remove(CONTENT_FIELD)?.kind {
        Some(Kind::StringValue(s)) => s,
        _ => return None,
    };

    let metadata = match payload.remove(METADATA_FIELD).map(qdrant_to_json) {
        Some(JsonValue::Object(map)) => map,
        _ => Metadata::new(),
    };

    Some(Document { content, metadata })
}

/// Translates a metadata filter into `must` match conditions on `metadata.<key>`.
///
/// Supported values: strings, integers, booleans, and arrays of all-strings or all-integers
/// (matched as "any of"). An empty filter yields `None`.
pub fn build_filter(filter: &Metadata) -> Result<Option<Filter>, VectorDbError> {
    if filter.is_empty() {
        return Ok(None);
    }

    let conditions = filter
        .iter()
        .map(|(key, value)| match_condition(key, value))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Filter::must(conditions)))
}

fn match_condition(key: &str, value: &JsonValue) -> Result<Condition, VectorDbError> {
    let field = format!("{METADATA_FIELD}.{key}");
    let unsupported = |reason: &str| VectorDbError::UnsupportedFilter {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    match value {
        JsonValue::String(s) => Ok(Condition::matches(field, s.clone())),
        JsonValue::Bool(b) => Ok(Condition::matches(field, *b)),
        JsonValue::Number(n) => n
            .as_i64()
            .map(|i| Condition::matches(field.clone(), i))
            .ok_or_else(|| unsupported("only integer numbers can be matched")),
        JsonValue::Array(items) => {
            if let Some(strings) = items
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect::<Option<Vec<String>>>()
                && !strings.is_empty()
            {
                return Ok(Condition::matches(field, strings));
            }
            if let Some(ints) = items
                .iter()
                .map(JsonValue::as_i64)
                .collect::<Option<Vec<i64>>>()
                && !ints.is_empty()
            {
                return Ok(Condition::matches(field, ints));
            }
            Err(unsupported(
                "arrays must be non-empty and all strings or all integers",
            ))
        }
        JsonValue::Null => Err(unsupported("null cannot be matched")),
        JsonValue::Object(_) => Err(unsupported("nested objects cannot be matched")),
    }
}
