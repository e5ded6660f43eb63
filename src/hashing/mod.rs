//! BLAKE3 digests used for reranker deduplication and score caching.
//!
//! Both digests are computed over a bounded content prefix (see
//! [`CONTENT_PREFIX_CHARS`](crate::constants::CONTENT_PREFIX_CHARS)), not the full text.
//! Two documents that share their first `CONTENT_PREFIX_CHARS` characters therefore map to
//! the same key: the reranker keeps only the first of them, and a cached score for one is
//! served for the other.

use blake3::Hasher;

use crate::constants::CONTENT_PREFIX_CHARS;

/// Returns the leading [`CONTENT_PREFIX_CHARS`] characters of `content`.
///
/// Slices on a char boundary, so multi-byte text never panics.
#[inline]
pub fn content_prefix(content: &str) -> &str {
    match content.char_indices().nth(CONTENT_PREFIX_CHARS) {
        Some((byte_idx, _)) => &content[..byte_idx],
        None => content,
    }
}

/// Digest used to deduplicate candidates within one rerank call.
#[inline]
pub fn hash_content_prefix(content: &str) -> [u8; 32] {
    *blake3::hash(content_prefix(content).as_bytes()).as_bytes()
}

/// Digest used as the [`ScoreCache`](crate::scoring::ScoreCache) key for a
/// (query, document) pair.
///
/// The query is length-prefixed so that `("ab", "c...")` and `("a", "bc...")` cannot collide.
#[inline]
pub fn score_cache_key(query: &str, content: &str) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(&(query.len() as u64).to_le_bytes());
    hasher.update(query.as_bytes());
    hasher.update(content_prefix(content).as_bytes());
    *hasher.finalize().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_content_prefix_short_content_unchanged() {
        assert_eq!(content_prefix("short"), "short");
        assert_eq!(content_prefix(""), "");
    }

    #[test]
    fn test_content_prefix_truncates_to_limit() {
        let long = "x".repeat(CONTENT_PREFIX_CHARS + 50);
        assert_eq!(content_prefix(&long).chars().count(), CONTENT_PREFIX_CHARS);
    }

    #[test]
    fn test_content_prefix_respects_char_boundaries() {
        let long = "é".repeat(CONTENT_PREFIX_CHARS + 5);
        let prefix = content_prefix(&long);

        assert_eq!(prefix.chars().count(), CONTENT_PREFIX_CHARS);
        assert_eq!(prefix.len(), CONTENT_PREFIX_CHARS * 'é'.len_utf8());
    }

    #[test]
    fn test_hash_content_prefix_determinism() {
        let content = "Rust is a systems programming language.";

        let hash1 = hash_content_prefix(content);
        let hash2 = hash_content_prefix(content);

        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_content_prefix_collides_on_shared_prefix() {
        let shared = "a".repeat(CONTENT_PREFIX_CHARS);
        let first = format!("{shared} first tail");
        let second = format!("{shared} a different tail");

        assert_eq!(hash_content_prefix(&first), hash_content_prefix(&second));
    }

    #[test]
    fn test_hash_content_prefix_uniqueness() {
        let inputs = [
            "machine learning",
            "Machine learning",
            "machine learning ",
            "deep learning",
        ];

        let hashes: HashSet<_> = inputs.iter().map(|i| hash_content_prefix(i)).collect();
        assert_eq!(hashes.len(), inputs.len());
    }

    #[test]
    fn test_score_cache_key_query_sensitivity() {
        let content = "Paris is the capital of France.";

        let a = score_cache_key("capital of France?", content);
        let b = score_cache_key("capital of Spain?", content);

        assert_ne!(a, b);
    }

    #[test]
    fn test_score_cache_key_length_prefix_prevents_ambiguity() {
        let hash1 = score_cache_key("ab", "cd");
        let hash2 = score_cache_key("abc", "d");
        let hash3 = score_cache_key("a", "bcd");

        assert_ne!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_ne!(hash2, hash3);
    }

    #[test]
    fn test_score_cache_key_ignores_content_past_prefix() {
        let shared = "b".repeat(CONTENT_PREFIX_CHARS);
        let first = format!("{shared}111");
        let second = format!("{shared}222");

        assert_eq!(
            score_cache_key("query", &first),
            score_cache_key("query", &second)
        );
    }
}
