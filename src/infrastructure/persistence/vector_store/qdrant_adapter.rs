use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{
    Condition, CountPointsBuilder, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder,
    DeletePointsBuilder, Distance, FieldType, Filter, PointId, PointStruct, PointsIdsList,
    ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder, Value, VectorParamsBuilder,
    VectorsConfig,
};
use qdrant_client::{Payload, Qdrant};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::ports::{
    CollectionConfig, DistanceMetric, SearchResult, VectorStore, VectorStoreError,
};
use crate::domain::{Chunk, ChunkId, DocumentMetadata, Embedding};

const SCROLL_PAGE_SIZE: u32 = 256;

pub struct QdrantAdapter {
    client: Arc<Qdrant>,
    collection_name: String,
}

impl QdrantAdapter {
    pub async fn new(url: &str, collection_name: String) -> Result<Self, VectorStoreError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            collection_name,
        })
    }

    pub fn with_client(client: Arc<Qdrant>, collection_name: String) -> Self {
        Self {
            client,
            collection_name,
        }
    }

    fn map_distance_metric(metric: &DistanceMetric) -> Distance {
        match metric {
            DistanceMetric::Cosine => Distance::Cosine,
            DistanceMetric::Euclidean => Distance::Euclid,
            DistanceMetric::DotProduct => Distance::Dot,
        }
    }

    fn file_path_filter(file_path: &str) -> Filter {
        Filter::must([Condition::matches("file_path", file_path.to_string())])
    }

    fn chunk_payload(chunk: &Chunk) -> Result<Payload, VectorStoreError> {
        Payload::try_from(serde_json::json!({
            "text": chunk.text,
            "source": chunk.metadata.source,
            "file_type": chunk.metadata.file_type,
            "file_path": chunk.metadata.file_path,
            "page": chunk.metadata.page,
            "chunk_index": chunk.chunk_index,
            "offset": chunk.offset,
        }))
        .map_err(|e| VectorStoreError::UpsertFailed(e.to_string()))
    }

    fn chunk_from_payload(id: Option<PointId>, payload: &HashMap<String, Value>) -> Option<Chunk> {
        let chunk_id = match id?.point_id_options? {
            PointIdOptions::Uuid(uuid) => Uuid::parse_str(&uuid).ok()?,
            PointIdOptions::Num(_) => return None,
        };

        let text_field = |key: &str| payload.get(key).and_then(|v| v.as_str()).cloned();

        Some(Chunk {
            id: ChunkId::from_uuid(chunk_id),
            text: text_field("text")?,
            metadata: DocumentMetadata {
                source: text_field("source")?,
                file_type: text_field("file_type").unwrap_or_default(),
                file_path: text_field("file_path").unwrap_or_default(),
                page: payload
                    .get("page")
                    .and_then(|v| v.as_integer())
                    .map(|v| v as u32),
            },
            chunk_index: payload.get("chunk_index")?.as_integer()? as usize,
            offset: payload
                .get("offset")
                .and_then(|v| v.as_integer())
                .unwrap_or(0) as usize,
        })
    }
}

#[async_trait]
impl VectorStore for QdrantAdapter {
    #[instrument(skip(self, config), fields(collection = %self.collection_name))]
    async fn create_collection(&self, config: &CollectionConfig) -> Result<bool, VectorStoreError> {
        if self.collection_exists().await? {
            info!(collection = %self.collection_name, "collection already exists");
            return Ok(false);
        }

        let vectors_config = VectorsConfig::from(VectorParamsBuilder::new(
            config.vector_dimensions,
            Self::map_distance_metric(&config.distance_metric),
        ));

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection_name).vectors_config(vectors_config),
            )
            .await
            .map_err(|e| VectorStoreError::CollectionCreationFailed(e.to_string()))?;

        info!(collection = %self.collection_name, "collection_created");

        for index in &config.payload_indexes {
            self.client
                .create_field_index(CreateFieldIndexCollectionBuilder::new(
                    &self.collection_name,
                    &index.field_name,
                    FieldType::Keyword,
                ))
                .await
                .map_err(|e| VectorStoreError::PayloadIndexFailed(e.to_string()))?;

            info!(
                collection = %self.collection_name,
                field = %index.field_name,
                "payload_index_applied"
            );
        }

        Ok(true)
    }

    #[instrument(skip(self), fields(collection = %self.collection_name))]
    async fn collection_exists(&self) -> Result<bool, VectorStoreError> {
        self.client
            .collection_exists(&self.collection_name)
            .await
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))
    }

    #[instrument(skip(self), fields(collection = %self.collection_name))]
    async fn delete_collection(&self) -> Result<(), VectorStoreError> {
        if !self.collection_exists().await? {
            return Ok(());
        }

        self.client
            .delete_collection(&self.collection_name)
            .await
            .map_err(|e| VectorStoreError::CollectionDeletionFailed(e.to_string()))?;

        info!(collection = %self.collection_name, "collection_deleted");
        Ok(())
    }

    #[instrument(skip(self, chunks, embeddings), fields(collection = %self.collection_name, count = chunks.len()))]
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

        let points = chunks
            .iter()
            .zip(embeddings.iter())
            .map(|(chunk, embedding)| {
                Ok(PointStruct::new(
                    PointId::from(chunk.id.as_uuid().to_string()),
                    embedding.values.clone(),
                    Self::chunk_payload(chunk)?,
                ))
            })
            .collect::<Result<Vec<_>, VectorStoreError>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection_name, points).wait(true))
            .await
            .map_err(|e| VectorStoreError::UpsertFailed(e.to_string()))?;

        info!(collection = %self.collection_name, count = chunks.len(), "points_upserted");
        Ok(())
    }

    #[instrument(skip(self, embedding), fields(collection = %self.collection_name, top_k = top_k))]
    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        if !self.collection_exists().await? {
            return Ok(Vec::new());
        }

        let search_result = self
            .client
            .search_points(
                SearchPointsBuilder::new(
                    &self.collection_name,
                    embedding.values.clone(),
                    top_k as u64,
                )
                .with_payload(true),
            )
            .await
            .map_err(|e| VectorStoreError::SearchFailed(e.to_string()))?;

        Ok(search_result
            .result
            .into_iter()
            .filter_map(|point| {
                let chunk = Self::chunk_from_payload(point.id, &point.payload)?;
                Some(SearchResult::new(chunk, point.score))
            })
            .collect())
    }

    #[instrument(skip(self, chunk_ids), fields(collection = %self.collection_name, count = chunk_ids.len()))]
    async fn delete(&self, chunk_ids: &[ChunkId]) -> Result<(), VectorStoreError> {
        let point_ids: Vec<PointId> = chunk_ids
            .iter()
            .map(|id| PointId::from(id.as_uuid().to_string()))
            .collect();

        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection_name)
                    .points(PointsIdsList { ids: point_ids })
                    .wait(true),
            )
            .await
            .map_err(|e| VectorStoreError::DeleteFailed(e.to_string()))?;

        info!(collection = %self.collection_name, count = chunk_ids.len(), "points_deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(collection = %self.collection_name))]
    async fn delete_by_file_path(&self, file_path: &str) -> Result<u64, VectorStoreError> {
        if !self.collection_exists().await? {
            return Ok(0);
        }

        let matching = self
            .client
            .count(
                CountPointsBuilder::new(&self.collection_name)
                    .filter(Self::file_path_filter(file_path))
                    .exact(true),
            )
            .await
            .map_err(|e| VectorStoreError::DeleteFailed(e.to_string()))?
            .result
            .map(|r| r.count)
            .unwrap_or(0);
        if matching == 0 {
            return Ok(0);
        }

        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection_name)
                    .points(Self::file_path_filter(file_path))
                    .wait(true),
            )
            .await
            .map_err(|e| VectorStoreError::DeleteFailed(e.to_string()))?;

        info!(collection = %self.collection_name, removed = matching, "file_points_deleted");
        Ok(matching)
    }

    async fn count(&self) -> Result<u64, VectorStoreError> {
        if !self.collection_exists().await? {
            return Ok(0);
        }

        let response = self
            .client
            .count(CountPointsBuilder::new(&self.collection_name).exact(true))
            .await
            .map_err(|e| VectorStoreError::SearchFailed(e.to_string()))?;

        Ok(response.result.map(|r| r.count).unwrap_or(0))
    }

    #[instrument(skip(self), fields(collection = %self.collection_name))]
    async fn list_sources(&self, limit: usize) -> Result<Vec<String>, VectorStoreError> {
        if !self.collection_exists().await? {
            return Ok(Vec::new());
        }

        let mut sources = BTreeSet::new();
        let mut offset: Option<PointId> = None;

        loop {
            let mut request = ScrollPointsBuilder::new(&self.collection_name)
                .limit(SCROLL_PAGE_SIZE)
                .with_payload(true)
                .with_vectors(false);
            if let Some(next) = offset.take() {
                request = request.offset(next);
            }

            let page = self
                .client
                .scroll(request)
                .await
                .map_err(|e| VectorStoreError::SearchFailed(e.to_string()))?;

            sources.extend(
                page.result
                    .iter()
                    .filter_map(|point| point.payload.get("source"))
                    .filter_map(|v| v.as_str().cloned()),
            );

            match page.next_page_offset {
                Some(next) if sources.len() < limit => offset = Some(next),
                _ => break,
            }
        }

        Ok(sources.into_iter().take(limit).collect())
    }
}
