use async_trait::async_trait;

use crate::domain::Embedding;

/// Turns chunk texts and questions into vectors of one fixed dimension.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Returns one embedding per input, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError>;

    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        self.embed_batch(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbedderError::InvalidResponse("no embedding returned".to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmbedderError {
    #[error("embedding request failed: {0}")]
    ApiRequestFailed(String),
    #[error("embedding provider rate limit reached")]
    RateLimited,
    #[error("unexpected embedding response: {0}")]
    InvalidResponse(String),
}
