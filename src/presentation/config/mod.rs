mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    ChunkingSettings, EmbeddingsSettings, LlmSettings, LoggingSettings, MemorySettings,
    OpenAiSettings, RetrievalSettings, ServerSettings, Settings, SettingsError,
    VectorStoreProvider, VectorStoreSettings,
};
