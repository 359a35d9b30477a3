use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat};
use serde::Deserialize;

use crate::application::ports::DistanceMetric;

use super::Environment;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    #[error("invalid environment: {0}")]
    Environment(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub openai: OpenAiSettings,
    pub embeddings: EmbeddingsSettings,
    pub llm: LlmSettings,
    pub chunking: ChunkingSettings,
    pub retrieval: RetrievalSettings,
    pub vector_store: VectorStoreSettings,
    pub memory: MemorySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsSettings {
    pub model: String,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub chat_model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkingSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalSettings {
    pub top_k: usize,
    pub max_context_tokens: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorStoreProvider {
    Local,
    Qdrant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VectorStoreSettings {
    pub provider: VectorStoreProvider,
    pub persist_dir: String,
    pub qdrant_url: String,
    pub collection_name: String,
    pub distance: DistanceMetric,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemorySettings {
    pub enabled: bool,
    pub max_messages: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Settings {
    /// Layers built-in defaults, `appsettings.<env>.toml` and `APP__SECTION__KEY` variables.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let environment = Environment::current().map_err(SettingsError::Environment)?;

        let configuration = Self::defaults()?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = configuration.try_deserialize()?;
        settings.apply_api_key_fallback(std::env::var("OPENAI_API_KEY").ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults overridden by an inline TOML document. Environment variables are not read.
    pub fn from_toml_str(toml: &str) -> Result<Self, SettingsError> {
        let settings: Settings = Self::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.max_upload_mb", 50)?
            .set_default("openai.api_key", "")?
            .set_default("openai.base_url", "https://api.openai.com/v1")?
            .set_default("openai.request_timeout_seconds", 60)?
            .set_default("embeddings.model", "text-embedding-ada-002")?
            .set_default("embeddings.batch_size", 256)?
            .set_default("llm.chat_model", "gpt-4")?
            .set_default("llm.temperature", 0.0)?
            .set_default("chunking.chunk_size", 1000)?
            .set_default("chunking.chunk_overlap", 200)?
            .set_default("retrieval.top_k", 4)?
            .set_default("retrieval.max_context_tokens", 3072)?
            .set_default("vector_store.provider", "local")?
            .set_default("vector_store.persist_dir", "./vector_db")?
            .set_default("vector_store.qdrant_url", "http://localhost:6334")?
            .set_default("vector_store.collection_name", "rag_chunks")?
            .set_default("vector_store.distance", "cosine")?
            .set_default("memory.enabled", true)?
            .set_default("memory.max_messages", 20)?
            .set_default("logging.level", "info,ragline=debug,tower_http=debug")?
            .set_default("logging.json", false)
    }

    fn apply_api_key_fallback(&mut self, fallback: Option<String>) {
        if self.openai.api_key.trim().is_empty() {
            if let Some(key) = fallback {
                self.openai.api_key = key;
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.chunking.chunk_size == 0 {
            return Err(SettingsError::Invalid(
                "chunking.chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(SettingsError::Invalid(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(SettingsError::Invalid(
                "retrieval.top_k must be greater than zero".to_string(),
            ));
        }
        if self.embeddings.batch_size == 0 {
            return Err(SettingsError::Invalid(
                "embeddings.batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_mb * 1024 * 1024
    }
}
