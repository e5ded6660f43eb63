use super::http::{EmbedData, order_by_index};
use super::*;

#[test]
fn test_order_by_index_reorders() {
    let data = vec![
        EmbedData {
            embedding: vec![2.0],
            index: 1,
        },
        EmbedData {
            embedding: vec![1.0],
            index: 0,
        },
    ];

    let vectors = order_by_index(data, 2).unwrap();

    assert_eq!(vectors, vec![vec![1.0], vec![2.0]]);
}

#[test]
fn test_order_by_index_count_mismatch() {
    let data = vec![EmbedData {
        embedding: vec![1.0],
        index: 0,
    }];

    assert!(matches!(
        order_by_index(data, 2),
        Err(EmbeddingError::CountMismatch {
            expected: 2,
            actual: 1
        })
    ));
}

#[test]
fn test_order_by_index_rejects_duplicates_and_out_of_range() {
    let duplicate = vec![
        EmbedData {
            embedding: vec![1.0],
            index: 0,
        },
        EmbedData {
            embedding: vec![2.0],
            index: 0,
        },
    ];
    assert!(matches!(
        order_by_index(duplicate, 2),
        Err(EmbeddingError::InvalidResponse { .. })
    ));

    let out_of_range = vec![EmbedData {
        embedding: vec![1.0],
        index: 5,
    }];
    assert!(matches!(
        order_by_index(out_of_range, 1),
        Err(EmbeddingError::InvalidResponse { .. })
    ));
}

#[test]
fn test_http_embedder_rejects_bad_url() {
    let result = HttpEmbedder::new("::not-a-url", "text-embedding-3-small", None);
    assert!(matches!(result, Err(EmbeddingError::InvalidConfig { .. })));
}

#[test]
fn test_http_embedder_debug_redacts_key() {
    let embedder = HttpEmbedder::new(
        "http://localhost:8080/v1/embeddings",
        "m",
        Some("sk-secret".to_string()),
    )
    .unwrap();

    let rendered = format!("{embedder:?}");
    assert!(!rendered.contains("sk-secret"));
    assert!(rendered.contains("<redacted>"));
}

#[tokio::test]
async fn test_http_embedder_empty_input_skips_request() {
    let embedder = HttpEmbedder::new("http://127.0.0.1:9/v1/embeddings", "m", None).unwrap();

    let vectors = embedder.embed(&[]).await.unwrap();

    assert!(vectors.is_empty());
}

#[tokio::test]
async fn test_http_embedder_unreachable_is_error() {
    let embedder = HttpEmbedder::new("http://127.0.0.1:9/v1/embeddings", "m", None).unwrap();

    let result = embedder.embed_query("hello").await;

    assert!(matches!(result, Err(EmbeddingError::RequestFailed { .. })));
}

#[tokio::test]
async fn test_mock_embedder_is_deterministic_and_normalized() {
    let embedder = MockEmbedder::new(16);

    let a = embedder.embed_query("rust").await.unwrap();
    let b = embedder.embed_query("rust").await.unwrap();
    let c = embedder.embed_query("go").await.unwrap();

    assert_eq!(a.len(), 16);
    assert_eq!(a, b);
    assert_ne!(a, c);
    let norm = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4);
    assert_eq!(embedder.call_count(), 3);
}
