mod clear;
mod error;
mod health;
mod ingest;
mod ingest_directory;
mod metrics;
mod query;
mod sources;

pub use clear::{clear_memory_handler, clear_store_handler};
pub use error::{ErrorResponse, ingestion_error_status, rag_error_status};
pub use health::{SERVICE_NAME, health_handler};
pub use ingest::ingest_handler;
pub use ingest_directory::ingest_directory_handler;
pub use metrics::metrics_handler;
pub use query::query_handler;
pub use sources::sources_handler;
