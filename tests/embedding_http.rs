mod common;

use common::{Behavior, EMBEDDINGS_PATH, spawn_embedder};
use ragline::embedding::{Embedder, EmbeddingError, HttpEmbedder};

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_embeddings_ordered_by_index() {
    let server = spawn_embedder(Behavior::Ok).await;
    let embedder = HttpEmbedder::new(
        &server.url(EMBEDDINGS_PATH),
        "test-model",
        Some("sk-test".to_string()),
    )
    .unwrap();

    let vectors = embedder.embed(&texts(&["a", "bbb", "cc"])).await.unwrap();

    assert_eq!(
        vectors,
        vec![
            vec![1.0, 1.0, 0.0],
            vec![3.0, 1.0, 0.0],
            vec![2.0, 1.0, 0.0]
        ]
    );
    assert_eq!(server.last_auth().as_deref(), Some("Bearer sk-test"));
}

#[tokio::test]
async fn test_no_auth_header_without_key() {
    let server = spawn_embedder(Behavior::Ok).await;
    let embedder = HttpEmbedder::new(&server.url(EMBEDDINGS_PATH), "m", None).unwrap();

    let vector = embedder.embed_query("hello").await.unwrap();

    assert_eq!(vector, vec![5.0, 1.0, 0.0]);
    assert!(server.last_auth().is_none());
}

#[tokio::test]
async fn test_server_error_is_request_failure() {
    let server = spawn_embedder(Behavior::ServerError).await;
    let embedder = HttpEmbedder::new(&server.url(EMBEDDINGS_PATH), "m", None).unwrap();

    let result = embedder.embed(&texts(&["a"])).await;

    match result {
        Err(EmbeddingError::RequestFailed { reason, .. }) => {
            assert!(reason.contains("500"), "unexpected reason: {reason}");
            assert!(reason.contains("model not loaded"));
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_short_response_is_count_mismatch() {
    let server = spawn_embedder(Behavior::Short).await;
    let embedder = HttpEmbedder::new(&server.url(EMBEDDINGS_PATH), "m", None).unwrap();

    let result = embedder.embed(&texts(&["a", "b"])).await;

    assert!(matches!(
        result,
        Err(EmbeddingError::CountMismatch {
            expected: 2,
            actual: 1
        })
    ));
}

#[tokio::test]
async fn test_garbage_body_is_invalid_response() {
    let server = spawn_embedder(Behavior::Garbage).await;
    let embedder = HttpEmbedder::new(&server.url(EMBEDDINGS_PATH), "m", None).unwrap();

    assert!(matches!(
        embedder.embed(&texts(&["a"])).await,
        Err(EmbeddingError::InvalidResponse { .. })
    ));
}
