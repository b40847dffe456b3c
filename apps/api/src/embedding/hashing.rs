use async_trait::async_trait;
use siphasher::sip::SipHasher13;
use std::hash::{Hash, Hasher};

use super::{require_text, EmbeddingError, EmbeddingProvider, SkillVector};

// Changing these keys changes every stored vector; re-embed the catalog if you do.
const HASH_KEY_0: u64 = 0x736b_696c_6c62_7269;
const HASH_KEY_1: u64 = 0x6467_6521_0000_0384;

/// Signed feature-hashing embedder.
///
/// Tokens are lower-cased words split on anything that is not alphanumeric
/// (with `+`, `#` and `.` kept so "c++", "c#" and "node.js" survive).
/// Each token lands in one bucket with a hashed sign; the result is L2-normalised.
/// Deterministic across runs and platforms, no model download required.
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash(&self, token: &str, salt: u8) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_KEY_0, HASH_KEY_1);
        token.hash(&mut hasher);
        salt.hash(&mut hasher);
        hasher.finish()
    }

    pub(crate) fn embed_tokens(&self, text: &str) -> SkillVector {
        let mut vector = vec![0.0f32; self.dimension];

        for token in tokenize(text) {
            let idx = (self.hash(&token, 0) % self.dimension as u64) as usize;
            let sign = if self.hash(&token, 1) % 2 == 0 { 1.0 } else { -1.0 };
            vector[idx] += sign;
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

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|t| t.trim_matches('.').to_lowercase())
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<SkillVector, EmbeddingError> {
        let text = require_text(text)?;
        Ok(self.embed_tokens(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &'static str {
        "hashing"
    }
}
