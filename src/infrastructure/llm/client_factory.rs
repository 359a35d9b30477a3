use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{Embedder, LlmClient};
use crate::presentation::config::Settings;

use super::{OpenAiChatClient, OpenAiEmbedder};

#[derive(Debug, thiserror::Error)]
pub enum ClientFactoryError {
    #[error("missing API key: set OPENAI_API_KEY or APP__OPENAI__API_KEY")]
    MissingApiKey,
    #[error("client initialization failed: {0}")]
    InitializationFailed(String),
}

/// Builds the hosted-model clients from settings, refusing to start without credentials.
pub struct ClientFactory;

impl ClientFactory {
    fn api_key(settings: &Settings) -> Result<String, ClientFactoryError> {
        Some(settings.openai.api_key.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .ok_or(ClientFactoryError::MissingApiKey)
    }

    pub fn create_embedder(settings: &Settings) -> Result<Arc<dyn Embedder>, ClientFactoryError> {
        let key = Self::api_key(settings)?;
        tracing::info!(model = %settings.embeddings.model, "Configuring OpenAI embedding model");

        let embedder = OpenAiEmbedder::new(key, settings.embeddings.model.clone())
            .with_base_url(&settings.openai.base_url)
            .with_batch_size(settings.embeddings.batch_size)
            .with_timeout(Duration::from_secs(settings.openai.request_timeout_seconds))
            .map_err(|e| ClientFactoryError::InitializationFailed(e.to_string()))?;

        Ok(Arc::new(embedder))
    }

    pub fn create_llm_client(
        settings: &Settings,
    ) -> Result<Arc<dyn LlmClient>, ClientFactoryError> {
        let key = Self::api_key(settings)?;
        tracing::info!(model = %settings.llm.chat_model, "Configuring OpenAI chat model");

        let client = OpenAiChatClient::new(key, settings.llm.chat_model.clone())
            .with_base_url(&settings.openai.base_url)
            .with_sampling(settings.llm.temperature, settings.llm.max_tokens)
            .with_timeout(Duration::from_secs(settings.openai.request_timeout_seconds))
            .map_err(|e| ClientFactoryError::InitializationFailed(e.to_string()))?;

        Ok(Arc::new(client))
    }
}
