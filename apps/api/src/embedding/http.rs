use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::{require_text, EmbeddingError, EmbeddingProvider, SkillVector};

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a str,
}

/// Client for a sentence-embedding server speaking the text-embeddings-inference
/// `/embed` shape: `{"inputs": "..."}` in, `[[f32, ...]]` out.
#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    url: String,
    dimension: usize,
}

impl HttpEmbedder {
    pub fn new(url: String, dimension: usize) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            url,
            dimension,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<SkillVector, EmbeddingError> {
        let text = require_text(text)?;

        let response = self
            .client
            .post(&self.url)
            .json(&EmbedRequest { inputs: text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let mut vectors: Vec<SkillVector> = response.json().await?;
        let vector = if vectors.is_empty() {
            Vec::new()
        } else {
            vectors.swap_remove(0)
        };
        check_dimension(vector, self.dimension)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

fn check_dimension(vector: SkillVector, expected: usize) -> Result<SkillVector, EmbeddingError> {
    if vector.len() != expected {
        return Err(EmbeddingError::Dimension {
            expected,
            actual: vector.len(),
        });
    }
    debug!("Embedding received: {} dimensions", vector.len());
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dimension_accepts_exact_length() {
        let v = check_dimension(vec![0.1, 0.2, 0.3], 3).unwrap();
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn test_check_dimension_rejects_short_vector() {
        let err = check_dimension(vec![0.1], 384).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::Dimension {
                expected: 384,
                actual: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_blank_text_fails_before_network() {
        // Unroutable URL: the request must never be attempted.
        let embedder = HttpEmbedder::new("http://127.0.0.1:9/embed".to_string(), 384);
        let err = embedder.embed("").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::EmptyInput));
    }
}
