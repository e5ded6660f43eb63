use std::collections::HashMap;

use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{PointId, ScoredPoint, Value as QdrantValue};
use serde_json::json;

use super::model::{
    CONTENT_FIELD, INGESTED_AT_FIELD, METADATA_FIELD, document_from_point, document_payload,
    json_to_qdrant, qdrant_to_json,
};
use super::*;
use crate::embedding::MockEmbedder;

fn metadata(value: serde_json::Value) -> Metadata {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

fn point_with_payload(payload: HashMap<String, QdrantValue>) -> ScoredPoint {
    ScoredPoint {
        id: Some(PointId::from(1u64)),
        payload,
        score: 0.9,
        ..Default::default()
    }
}

#[test]
fn test_json_qdrant_conversion_preserves_structure() {
    let original = json!({
        "source": "handbook.pdf",
        "page": 12,
        "weight": 0.5,
        "draft": false,
        "tags": ["a", "b"],
        "nested": {"k": null},
    });

    let converted = qdrant_to_json(json_to_qdrant(original.clone()));

    assert_eq!(converted, original);
}

#[test]
fn test_integers_stay_integers() {
    let value = json_to_qdrant(json!(42));
    assert!(matches!(value.kind, Some(Kind::IntegerValue(42))));
}

#[test]
fn test_document_payload_roundtrip_through_point() {
    let document = Document::new("Paris is the capital of France.")
        .with_metadata("source", "geo.txt")
        .with_metadata("page", 3);

    let payload = document_payload(document.clone(), "2026-01-01T00:00:00+00:00");
    assert!(payload.contains_key(CONTENT_FIELD));
    assert!(payload.contains_key(METADATA_FIELD));
    assert!(payload.contains_key(INGESTED_AT_FIELD));

    let recovered = document_from_point(point_with_payload(payload)).unwrap();
    assert_eq!(recovered, document);
}

#[test]
fn test_point_without_content_is_skipped() {
    let mut payload = HashMap::new();
    payload.insert("other".to_string(), "x".to_string().into());

    assert!(document_from_point(point_with_payload(payload)).is_none());
}

#[test]
fn test_point_without_metadata_gets_empty_map() {
    let mut payload = HashMap::new();
    payload.insert(CONTENT_FIELD.to_string(), "text".to_string().into());

    let document = document_from_point(point_with_payload(payload)).unwrap();
    assert!(document.metadata.is_empty());
}

#[test]
fn test_build_filter_empty_is_none() {
    assert!(build_filter(&Metadata::new()).unwrap().is_none());
}

#[test]
fn test_build_filter_supported_values() {
    let filter = build_filter(&metadata(json!({
        "source": "a.pdf",
        "page": 4,
        "published": true,
        "tags": ["rust", "async"],
        "ids": [1, 2, 3],
    })))
    .unwrap()
    .unwrap();

    assert_eq!(filter.must.len(), 5);
}

#[test]
fn test_build_filter_rejects_unsupported_values() {
    for value in [
        json!({"score": 0.5}),
        json!({"missing": null}),
        json!({"nested": {"a": 1}}),
        json!({"mixed": ["a", 1]}),
        json!({"empty": []}),
    ] {
        let result = build_filter(&metadata(value.clone()));
        assert!(
            matches!(result, Err(VectorDbError::UnsupportedFilter { .. })),
            "expected rejection for {value}"
        );
    }
}

#[tokio::test]
async fn test_qdrant_store_rejects_bad_filter_before_embedding() {
    let embedder = MockEmbedder::new(8);
    let store = QdrantStore::new("http://127.0.0.1:6334", "docs", embedder.clone()).unwrap();

    let result = store
        .search("query", 5, &metadata(json!({"weight": 0.25})))
        .await;

    assert!(matches!(result, Err(VectorDbError::UnsupportedFilter { .. })));
    assert_eq!(embedder.call_count(), 0);
    assert_eq!(store.collection(), "docs");
}

#[tokio::test]
async fn test_qdrant_store_empty_write_is_noop() {
    let embedder = MockEmbedder::new(8);
    let store = QdrantStore::new("http://127.0.0.1:6334", "docs", embedder.clone()).unwrap();

    assert_eq!(store.add_documents(Vec::new()).await.unwrap(), 0);
    assert_eq!(embedder.call_count(), 0);
}

#[tokio::test]
async fn test_mock_store_search_takes_k_in_order() {
    let store = MockVectorStore::with_documents(
        (0..10).map(|i| Document::new(format!("doc {i}"))).collect(),
    );

    let results = store.search("q", 3, &Metadata::new()).await.unwrap();

    let contents: Vec<_> = results.iter().map(|d| d.content.as_str()).collect();
    assert_eq!(contents, vec!["doc 0", "doc 1", "doc 2"]);
    assert_eq!(store.searches()[0].k, 3);
}

#[tokio::test]
async fn test_mock_store_filters_on_metadata() {
    let store = MockVectorStore::with_documents(vec![
        Document::new("a").with_metadata("source", "x"),
        Document::new("b").with_metadata("source", "y"),
        Document::new("c").with_metadata("source", "z"),
    ]);

    let exact = store
        .search("q", 10, &metadata(json!({"source": "y"})))
        .await
        .unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].content, "b");

    let any_of = store
        .search("q", 10, &metadata(json!({"source": ["x", "z"]})))
        .await
        .unwrap();
    assert_eq!(any_of.len(), 2);
}

#[tokio::test]
async fn test_mock_store_failure_and_add() {
    let store = MockVectorStore::new();

    assert_eq!(
        store
            .add_documents(vec![Document::new("a"), Document::new("b")])
            .await
            .unwrap(),
        2
    );
    assert_eq!(store.document_count(), 2);

    store.fail();
    assert!(matches!(
        store.search("q", 1, &Metadata::new()).await,
        Err(VectorDbError::SearchFailed { .. })
    ));
    assert!(store.add_documents(vec![Document::new("c")]).await.is_err());

    store.recover();
    assert_eq!(store.search("q", 5, &Metadata::new()).await.unwrap().len(), 2);
}
