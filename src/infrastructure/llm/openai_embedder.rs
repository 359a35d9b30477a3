use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{Embedder, EmbedderError};
use crate::domain::Embedding;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_BATCH_SIZE: usize = 256;

pub struct OpenAiEmbedder {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    batch_size: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [&'a str],
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            base_url: OPENAI_BASE_URL.to_string(),
            api_key,
            model,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, EmbedderError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbedderError::ApiRequestFailed(e.to_string()))?;
        Ok(self)
    }

    #[tracing::instrument(skip(self, texts), fields(model = %self.model, count = texts.len()))]
    async fn request_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                input: texts,
                model: &self.model,
            })
            .send()
            .await
            .map_err(|e| EmbedderError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EmbedderError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbedderError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let mut embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbedderError::InvalidResponse(e.to_string()))?;

        if embedding_response.data.len() != texts.len() {
            return Err(EmbedderError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embedding_response.data.len()
            )));
        }

        embedding_response.data.sort_by_key(|d| d.index);

        Ok(embedding_response
            .data
            .into_iter()
            .map(|d| Embedding::new(d.embedding))
            .collect())
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            embeddings.extend(self.request_batch(batch).await?);
        }

        Ok(embeddings)
    }
}
