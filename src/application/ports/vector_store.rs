use async_trait::async_trait;

use super::{CollectionConfig, SearchResult, VectorStoreError};
use crate::domain::{Chunk, ChunkId, Embedding};

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Returns `false` when the collection already existed.
    async fn create_collection(&self, config: &CollectionConfig) -> Result<bool, VectorStoreError>;

    async fn collection_exists(&self) -> Result<bool, VectorStoreError>;

    async fn delete_collection(&self) -> Result<(), VectorStoreError>;

    async fn upsert(
        &self,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError>;

    /// Ranked by descending score. A missing collection yields no results.
    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError>;

    async fn delete(&self, chunk_ids: &[ChunkId]) -> Result<(), VectorStoreError>;

    /// Removes every point stored for `file_path` and returns how many were removed.
    async fn delete_by_file_path(&self, file_path: &str) -> Result<u64, VectorStoreError>;

    async fn count(&self) -> Result<u64, VectorStoreError>;

    /// Distinct source file names, sorted.
    async fn list_sources(&self, limit: usize) -> Result<Vec<String>, VectorStoreError>;
}
