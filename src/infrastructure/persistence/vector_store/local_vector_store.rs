//! Vector store kept in memory and persisted as a single JSON file.
//!
//! Search is an exact scan over every stored point, which is adequate for the
//! document volumes a single-node deployment ingests. Every mutation is applied
//! to a copy, written to `index.json` through a temp file and a rename, and only
//! swapped in once the write succeeded. The write lock is held throughout, so
//! the file on disk always matches the in-memory index.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::ports::{
    CollectionConfig, DistanceMetric, SearchResult, VectorStore, VectorStoreError,
};
use crate::domain::{Chunk, ChunkId, DocumentMetadata, Embedding};

const INDEX_FILE: &str = "index.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredPoint {
    id: Uuid,
    text: String,
    source: String,
    file_type: String,
    file_path: String,
    page: Option<u32>,
    chunk_index: usize,
    offset: usize,
    vector: Vec<f32>,
}

impl StoredPoint {
    fn from_chunk(chunk: &Chunk, embedding: &Embedding) -> Self {
        Self {
            id: chunk.id.as_uuid(),
            text: chunk.text.clone(),
            source: chunk.metadata.source.clone(),
            file_type: chunk.metadata.file_type.clone(),
            file_path: chunk.metadata.file_path.clone(),
            page: chunk.metadata.page,
            chunk_index: chunk.chunk_index,
            offset: chunk.offset,
            vector: embedding.values.clone(),
        }
    }

    fn to_chunk(&self) -> Chunk {
        Chunk {
            id: ChunkId::from_uuid(self.id),
            text: self.text.clone(),
            metadata: DocumentMetadata {
                source: self.source.clone(),
                file_type: self.file_type.clone(),
                file_path: self.file_path.clone(),
                page: self.page,
            },
            chunk_index: self.chunk_index,
            offset: self.offset,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Collection {
    dimensions: u64,
    distance: DistanceMetric,
    points: BTreeMap<Uuid, StoredPoint>,
}

pub struct LocalVectorStore {
    persist_dir: PathBuf,
    collection: RwLock<Option<Collection>>,
}

impl LocalVectorStore {
    /// Opens the store in `persist_dir`, loading a previously saved index if present.
    pub async fn open(persist_dir: impl AsRef<Path>) -> Result<Self, VectorStoreError> {
        let persist_dir = persist_dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&persist_dir)
            .await
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;

        let index_path = persist_dir.join(INDEX_FILE);
        let collection = match tokio::fs::read(&index_path).await {
            Ok(bytes) => {
                let collection: Collection = serde_json::from_slice(&bytes).map_err(|e| {
                    VectorStoreError::ConnectionFailed(format!(
                        "corrupt index {}: {e}",
                        index_path.display()
                    ))
                })?;
                info!(
                    path = %index_path.display(),
                    points = collection.points.len(),
                    "local_index_loaded"
                );
                Some(collection)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(VectorStoreError::ConnectionFailed(e.to_string())),
        };

        Ok(Self {
            persist_dir,
            collection: RwLock::new(collection),
        })
    }

    pub fn persist_dir(&self) -> &Path {
        &self.persist_dir
    }

    async fn persist(&self, collection: Option<&Collection>) -> Result<(), VectorStoreError> {
        let index_path = self.persist_dir.join(INDEX_FILE);

        let Some(collection) = collection else {
            return match tokio::fs::remove_file(&index_path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(VectorStoreError::PersistenceFailed(e.to_string())),
            };
        };

        let bytes = serde_json::to_vec(collection)
            .map_err(|e| VectorStoreError::PersistenceFailed(e.to_string()))?;
        let temp_path = self.persist_dir.join(format!("{INDEX_FILE}.tmp"));

        tokio::fs::write(&temp_path, bytes)
            .await
            .map_err(|e| VectorStoreError::PersistenceFailed(e.to_string()))?;
        tokio::fs::rename(&temp_path, &index_path)
            .await
            .map_err(|e| VectorStoreError::PersistenceFailed(e.to_string()))
    }
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    #[instrument(skip(self, config), fields(dimensions = config.vector_dimensions))]
    async fn create_collection(&self, config: &CollectionConfig) -> Result<bool, VectorStoreError> {
        let mut guard = self.collection.write().await;
        if guard.is_some() {
            return Ok(false);
        }

        let collection = Collection {
            dimensions: config.vector_dimensions,
            distance: config.distance_metric,
            points: BTreeMap::new(),
        };
        self.persist(Some(&collection))
            .await
            .map_err(|e| VectorStoreError::CollectionCreationFailed(e.to_string()))?;
        *guard = Some(collection);

        info!(path = %self.persist_dir.display(), "collection_created");
        Ok(true)
    }

    async fn collection_exists(&self) -> Result<bool, VectorStoreError> {
        Ok(self.collection.read().await.is_some())
    }

    #[instrument(skip(self))]
    async fn delete_collection(&self) -> Result<(), VectorStoreError> {
        let mut guard = self.collection.write().await;
        self.persist(None)
            .await
            .map_err(|e| VectorStoreError::CollectionDeletionFailed(e.to_string()))?;
        *guard = None;

        info!(path = %self.persist_dir.display(), "collection_deleted");
        Ok(())
    }

    #[instrument(skip(self, chunks, embeddings), fields(count = chunks.len()))]
    async fn upsert(
        &self,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError> {
        if chunks.len() != embeddings.len() {
            return Err(VectorStoreError::UpsertFailed(
                "chunks and embeddings count mismatch".to_string(),
            ));
        }

        let mut guard = self.collection.write().await;
        let current = guard.as_ref().ok_or_else(|| {
            VectorStoreError::UpsertFailed("collection does not exist".to_string())
        })?;

        if let Some(bad) = embeddings
            .iter()
            .find(|e| e.dimensions() as u64 != current.dimensions)
        {
            return Err(VectorStoreError::DimensionMismatch {
                expected: current.dimensions,
                actual: bad.dimensions() as u64,
            });
        }

        let mut updated = current.clone();
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            updated
                .points
                .insert(chunk.id.as_uuid(), StoredPoint::from_chunk(chunk, embedding));
        }

        self.persist(Some(&updated)).await?;
        *guard = Some(updated);
        info!(count = chunks.len(), "points_upserted");
        Ok(())
    }

    #[instrument(skip(self, embedding), fields(top_k = top_k))]
    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        let guard = self.collection.read().await;
        let Some(collection) = guard.as_ref() else {
            return Ok(Vec::new());
        };

        if embedding.dimensions() as u64 != collection.dimensions {
            return Err(VectorStoreError::DimensionMismatch {
                expected: collection.dimensions,
                actual: embedding.dimensions() as u64,
            });
        }

        let mut scored: Vec<(f32, &StoredPoint)> = collection
            .points
            .values()
            .map(|point| {
                let candidate = Embedding::new(point.vector.clone());
                (collection.distance.score(embedding, &candidate), point)
            })
            .collect();

        scored.sort_by(|(a_score, a), (b_score, b)| {
            b_score
                .partial_cmp(a_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.source.cmp(&b.source))
                .then_with(|| a.chunk_index.cmp(&b.chunk_index))
        });

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(score, point)| SearchResult::new(point.to_chunk(), score))
            .collect())
    }

    #[instrument(skip(self, chunk_ids), fields(count = chunk_ids.len()))]
    async fn delete(&self, chunk_ids: &[ChunkId]) -> Result<(), VectorStoreError> {
        let mut guard = self.collection.write().await;
        let Some(current) = guard.as_ref() else {
            return Ok(());
        };

        let mut updated = current.clone();
        for id in chunk_ids {
            updated.points.remove(&id.as_uuid());
        }

        self.persist(Some(&updated))
            .await
            .map_err(|e| VectorStoreError::DeleteFailed(e.to_string()))?;
        *guard = Some(updated);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_file_path(&self, file_path: &str) -> Result<u64, VectorStoreError> {
        let mut guard = self.collection.write().await;
        let Some(current) = guard.as_ref() else {
            return Ok(0);
        };

        let mut updated = current.clone();
        updated.points.retain(|_, point| point.file_path != file_path);
        let removed = (current.points.len() - updated.points.len()) as u64;
        if removed == 0 {
            return Ok(0);
        }

        self.persist(Some(&updated))
            .await
            .map_err(|e| VectorStoreError::DeleteFailed(e.to_string()))?;
        *guard = Some(updated);

        info!(removed, "file_points_deleted");
        Ok(removed)
    }

    async fn count(&self) -> Result<u64, VectorStoreError> {
        Ok(self
            .collection
            .read()
            .await
            .as_ref()
            .map(|c| c.points.len() as u64)
            .unwrap_or(0))
    }

    async fn list_sources(&self, limit: usize) -> Result<Vec<String>, VectorStoreError> {
        let guard = self.collection.read().await;
        let sources: BTreeSet<&str> = guard
            .iter()
            .flat_map(|c| c.points.values())
            .map(|p| p.source.as_str())
            .collect();

        Ok(sources
            .into_iter()
            .take(limit)
            .map(str::to_string)
            .collect())
    }
}
