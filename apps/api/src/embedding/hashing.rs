use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use siphasher::sip::SipHasher13;

use crate::embedding::{EmbedError, Embedder};

/// Fixed seeds so vectors are stable across runs and Rust versions.
/// Changing them changes every embedding.
const HASH_SEED_K0: u64 = 0x5265_7375_6d65_4d61;
const HASH_SEED_K1: u64 = 0x7463_6845_6d62_6564;

const UNIGRAM_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 0.5;

pub const DEFAULT_DIMENSION: usize = 384;

/// Feature-hashing embedder.
///
/// Lowercased alphanumeric words and adjacent word pairs are hashed into a
/// fixed number of buckets with a signed hash, then L2-normalized. Texts that
/// share vocabulary land close together; it carries no learned semantics.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    #[allow(dead_code)]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn hash(&self, feature: &str) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        feature.hash(&mut hasher);
        hasher.finish()
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let h = self.hash(feature);
        let idx = (h % self.dimension as u64) as usize;
        // Top bit picks the sign so collisions tend to cancel.
        let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
        vector[idx] += sign * weight;
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];

        let words: Vec<String> = text
            .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();

        for word in &words {
            self.add_feature(&mut vector, word, UNIGRAM_WEIGHT);
        }
        for pair in words.windows(2) {
            self.add_feature(&mut vector, &format!("{} {}", pair[0], pair[1]), BIGRAM_WEIGHT);
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn name(&self) -> &'static str {
        "hash"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(self.embed_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::cosine_similarity;

    #[test]
    fn test_vectors_are_normalized() {
        let emb = HashEmbedder::default();
        let v = emb.embed_text("Python developer with Flask experience");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm was {norm}");
        assert_eq!(v.len(), DEFAULT_DIMENSION);
    }

    #[test]
    fn test_deterministic() {
        let emb = HashEmbedder::new(64);
        assert_eq!(emb.embed_text("Rust engineer"), emb.embed_text("Rust engineer"));
    }

    #[test]
    fn test_case_insensitive() {
        let emb = HashEmbedder::default();
        assert_eq!(emb.embed_text("PYTHON Developer"), emb.embed_text("python developer"));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let emb = HashEmbedder::new(16);
        assert!(emb.embed_text("  ... ").iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_shared_vocabulary_scores_higher() {
        let emb = HashEmbedder::default();
        let jd = emb.embed_text("Python developer with Flask and machine learning");
        let close = emb.embed_text("Python developer, Flask, machine learning projects");
        let far = emb.embed_text("Registered nurse in pediatric intensive care");
        assert!(cosine_similarity(&jd, &close) > cosine_similarity(&jd, &far));
    }

    #[test]
    fn test_zero_dimension_is_clamped() {
        assert_eq!(HashEmbedder::new(0).dimension(), 1);
    }
}
