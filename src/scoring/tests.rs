use super::*;

#[test]
fn test_score_cache_roundtrip() {
    let cache = ScoreCache::new();
    assert!(cache.is_empty());

    cache.insert("what is rust?", "Rust is a systems language.", 0.92);

    assert_eq!(cache.get("what is rust?", "Rust is a systems language."), Some(0.92));
    assert_eq!(cache.get("what is go?", "Rust is a systems language."), None);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_score_cache_shares_entries_across_prefix() {
    let cache = ScoreCache::new();
    let shared = "p".repeat(crate::constants::CONTENT_PREFIX_CHARS);

    cache.insert("q", &format!("{shared}-first"), 0.4);

    assert_eq!(cache.get("q", &format!("{shared}-second")), Some(0.4));
}

#[test]
fn test_score_cache_last_write_wins() {
    let cache = ScoreCache::new();
    cache.insert("q", "doc", 0.1);
    cache.insert("q", "doc", 0.7);

    assert_eq!(cache.get("q", "doc"), Some(0.7));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_score_cache_clones_share_storage() {
    let cache = ScoreCache::new();
    let clone = cache.clone();

    clone.insert("q", "doc", 0.5);

    assert_eq!(cache.get("q", "doc"), Some(0.5));
}

#[test]
fn test_score_cache_clear() {
    let cache = ScoreCache::new();
    cache.insert("q", "a", 0.1);
    cache.insert("q", "b", 0.2);

    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.get("q", "a"), None);
}

#[test]
fn test_cross_encoder_client_rejects_invalid_endpoint() {
    let result = CrossEncoderClient::new("not a url");
    assert!(matches!(result, Err(ScoringError::InvalidEndpoint { .. })));
}

#[test]
fn test_cross_encoder_client_keeps_endpoint() {
    let client = CrossEncoderClient::new("http://localhost:7000/rerank").unwrap();
    assert_eq!(client.endpoint(), "http://localhost:7000/rerank");
}

#[tokio::test]
async fn test_cross_encoder_client_empty_batch_skips_request() {
    let client = CrossEncoderClient::new("http://127.0.0.1:9/rerank").unwrap();

    let scores = client.score_texts("query", &[]).await;

    assert!(scores.is_empty());
}

#[tokio::test]
async fn test_cross_encoder_client_unreachable_returns_zeros() {
    let client = CrossEncoderClient::new("http://127.0.0.1:9/rerank").unwrap();
    let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];

    let scores = client.score("query", &texts).await.unwrap();

    assert_eq!(scores, vec![0.0, 0.0, 0.0]);
}

#[tokio::test]
async fn test_mock_scorer_records_batches() {
    let scorer = MockScorer::keyword(vec![("rust", 0.9)], 0.1);
    let handle = scorer.clone();
    let texts = vec!["rust book".to_string(), "cooking".to_string()];

    let scores = scorer.score("q", &texts).await.unwrap();

    assert_eq!(scores, vec![0.9, 0.1]);
    assert_eq!(handle.batch_count(), 1);
    assert_eq!(handle.batches()[0], texts);
    assert_eq!(handle.scored_text_count(), 2);
}

#[tokio::test]
async fn test_mock_scorer_failure_modes() {
    let scorer = MockScorer::constant(0.5);
    let texts = vec!["a".to_string(), "b".to_string()];

    scorer.fail();
    assert!(matches!(
        scorer.score("q", &texts).await,
        Err(ScoringError::Unavailable { .. })
    ));

    scorer.short_batches();
    assert_eq!(scorer.score("q", &texts).await.unwrap().len(), 1);

    scorer.recover();
    assert_eq!(scorer.score("q", &texts).await.unwrap(), vec![0.5, 0.5]);
    assert_eq!(scorer.batch_count(), 3);
}
