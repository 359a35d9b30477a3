mod ingestion_service;
mod metrics;
mod rag_service;
mod token_counter;

pub use ingestion_service::{
    DirectoryIngestionReport, IngestionError, IngestionFailure, IngestionReport, IngestionService,
};
pub use metrics::{MetricsSnapshot, ServiceMetrics};
pub use rag_service::{
    NO_CONTEXT_ANSWER, QueryResponse, RagError, RagService, SourceChunk,
};
pub use token_counter::count_tokens;
