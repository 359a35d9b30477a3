use async_trait::async_trait;

use crate::domain::{Document, SourceFile};

/// Turns the raw bytes of a file into one or more text documents.
#[async_trait]
pub trait FileLoader: Send + Sync {
    async fn load(&self, data: &[u8], file: &SourceFile) -> Result<Vec<Document>, FileLoaderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FileLoaderError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("no text found in {0}")]
    NoTextFound(String),
}
