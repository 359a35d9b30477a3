use std::sync::Arc;

use crate::application::services::{IngestionService, RagService, ServiceMetrics};

#[derive(Clone)]
pub struct AppState {
    pub ingestion_service: Arc<IngestionService>,
    pub rag_service: Arc<RagService>,
    pub metrics: Arc<ServiceMetrics>,
    pub max_upload_bytes: usize,
}
