use async_trait::async_trait;

use crate::domain::{Chunk, Document};

#[async_trait]
pub trait TextSplitter: Send + Sync {
    /// Splits `document` into chunks numbered from `first_index` upwards.
    async fn split(
        &self,
        document: &Document,
        first_index: usize,
    ) -> Result<Vec<Chunk>, TextSplitterError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TextSplitterError {
    #[error("invalid splitter configuration: {0}")]
    InvalidConfiguration(String),
}
