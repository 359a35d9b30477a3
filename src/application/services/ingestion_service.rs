use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, instrument, warn};
use walkdir::WalkDir;

use crate::application::ports::{
    CollectionConfig, DistanceMetric, Embedder, EmbedderError, FileLoader, FileLoaderError,
    TextSplitter, TextSplitterError, VectorStore, VectorStoreError,
};
use crate::domain::{Chunk, ContentType, SourceFile};

use super::ServiceMetrics;

const MAX_LISTED_SOURCES: usize = 10_000;

/// Outcome of ingesting a single file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionReport {
    pub documents_processed: usize,
    pub chunks_created: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionFailure {
    pub file: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryIngestionReport {
    pub files_ingested: usize,
    pub documents_processed: usize,
    pub chunks_created: usize,
    pub failures: Vec<IngestionFailure>,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("file loading: {0}")]
    FileLoading(#[from] FileLoaderError),
    #[error("text splitting: {0}")]
    Splitting(#[from] TextSplitterError),
    #[error("embedding: {0}")]
    Embedding(#[from] EmbedderError),
    #[error("storage: {0}")]
    Storage(#[from] VectorStoreError),
    #[error("io: {0}")]
    Io(String),
    #[error("directory not found: {0}")]
    NotADirectory(String),
    #[error("no supported documents found in {0}")]
    NoDocumentsFound(String),
}

pub struct IngestionService {
    file_loader: Arc<dyn FileLoader>,
    text_splitter: Arc<dyn TextSplitter>,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    metrics: Arc<ServiceMetrics>,
    distance_metric: DistanceMetric,
    collection_lock: Mutex<()>,
}

impl IngestionService {
    pub fn new(
        file_loader: Arc<dyn FileLoader>,
        text_splitter: Arc<dyn TextSplitter>,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            file_loader,
            text_splitter,
            embedder,
            vector_store,
            metrics,
            distance_metric: DistanceMetric::Cosine,
            collection_lock: Mutex::new(()),
        }
    }

    pub fn with_distance_metric(mut self, distance_metric: DistanceMetric) -> Self {
        self.distance_metric = distance_metric;
        self
    }

    /// Ingests an uploaded file. The extension decides the format; `mime` is the fallback.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn ingest_bytes(
        &self,
        data: &[u8],
        filename: &str,
        mime: Option<&str>,
    ) -> Result<IngestionReport, IngestionError> {
        let content_type = ContentType::from_path(filename)
            .or_else(|| mime.and_then(ContentType::from_mime))
            .ok_or_else(|| IngestionError::UnsupportedFormat(filename.to_string()))?;

        let file = SourceFile::new(
            filename.to_string(),
            filename.to_string(),
            content_type,
            data.len() as u64,
        );
        self.ingest_source(data, &file).await
    }

    /// Ingests one file. Points are keyed by the canonical path, so equivalent paths share them.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn ingest_path(&self, path: &Path) -> Result<IngestionReport, IngestionError> {
        let content_type = ContentType::from_path(path)
            .ok_or_else(|| IngestionError::UnsupportedFormat(path.display().to_string()))?;

        let path = canonical(path).await?;
        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| IngestionError::Io(format!("{}: {e}", path.display())))?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let file = SourceFile::new(
            filename,
            path.display().to_string(),
            content_type,
            data.len() as u64,
        );
        self.ingest_source(&data, &file).await
    }

    /// Ingests every supported file below `dir`, continuing past per-file failures.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub async fn ingest_directory(
        &self,
        dir: &Path,
    ) -> Result<DirectoryIngestionReport, IngestionError> {
        let is_dir = tokio::fs::metadata(dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(IngestionError::NotADirectory(dir.display().to_string()));
        }

        let root = canonical(dir).await?;
        let files = discover_supported_files(root).await?;
        if files.is_empty() {
            return Err(IngestionError::NoDocumentsFound(dir.display().to_string()));
        }

        let mut report = DirectoryIngestionReport::default();
        for path in files {
            match self.ingest_path(&path).await {
                Ok(file_report) => {
                    report.files_ingested += 1;
                    report.documents_processed += file_report.documents_processed;
                    report.chunks_created += file_report.chunks_created;
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "file_ingestion_failed");
                    report.failures.push(IngestionFailure {
                        file: path.display().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            files_ingested = report.files_ingested,
            failures = report.failures.len(),
            chunks_created = report.chunks_created,
            "directory_ingested"
        );
        Ok(report)
    }

    pub async fn list_sources(&self) -> Result<Vec<String>, IngestionError> {
        Ok(self.vector_store.list_sources(MAX_LISTED_SOURCES).await?)
    }

    pub async fn indexed_chunk_count(&self) -> Result<u64, IngestionError> {
        Ok(self.vector_store.count().await?)
    }

    /// Drops the whole collection; the next ingestion recreates it.
    #[instrument(skip(self))]
    pub async fn clear_index(&self) -> Result<(), IngestionError> {
        let _guard = self.collection_lock.lock().await;
        self.vector_store.delete_collection().await?;
        info!("index_cleared");
        Ok(())
    }

    async fn ingest_source(
        &self,
        data: &[u8],
        file: &SourceFile,
    ) -> Result<IngestionReport, IngestionError> {
        let documents = self.file_loader.load(data, file).await?;

        let mut chunks: Vec<Chunk> = Vec::new();
        for document in &documents {
            let mut document_chunks = self.text_splitter.split(document, chunks.len()).await?;
            chunks.append(&mut document_chunks);
        }

        if chunks.is_empty() {
            {
                let _guard = self.collection_lock.lock().await;
                self.vector_store.delete_by_file_path(&file.file_path).await?;
            }
            self.metrics.record_ingestion(documents.len(), 0);
            return Ok(IngestionReport {
                documents_processed: documents.len(),
                chunks_created: 0,
            });
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let dimensions = embeddings
            .first()
            .map(|e| e.dimensions() as u64)
            .ok_or_else(|| {
                IngestionError::Embedding(EmbedderError::InvalidResponse(
                    "no embeddings returned".to_string(),
                ))
            })?;

        {
            let _guard = self.collection_lock.lock().await;
            self.ensure_collection(dimensions).await?;
            let replaced = self.vector_store.delete_by_file_path(&file.file_path).await?;
            if replaced > 0 {
                info!(file_path = %file.file_path, replaced, "previous_points_removed");
            }
            self.vector_store.upsert(&chunks, &embeddings).await?;
        }

        self.metrics.record_ingestion(documents.len(), chunks.len());

        info!(
            source = %file.filename,
            documents = documents.len(),
            chunks = chunks.len(),
            "file_ingested"
        );

        Ok(IngestionReport {
            documents_processed: documents.len(),
            chunks_created: chunks.len(),
        })
    }

    async fn ensure_collection(&self, dimensions: u64) -> Result<(), VectorStoreError> {
        if self.vector_store.collection_exists().await? {
            return Ok(());
        }

        let config = CollectionConfig::new(dimensions).with_distance_metric(self.distance_metric);
        self.vector_store.create_collection(&config).await?;
        Ok(())
    }
}

async fn canonical(path: &Path) -> Result<PathBuf, IngestionError> {
    tokio::fs::canonicalize(path)
        .await
        .map_err(|e| IngestionError::Io(format!("{}: {e}", path.display())))
}

async fn discover_supported_files(dir: PathBuf) -> Result<Vec<PathBuf>, IngestionError> {
    tokio::task::spawn_blocking(move || {
        let mut files: Vec<PathBuf> = WalkDir::new(&dir)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| ContentType::from_path(path).is_some())
            .collect();
        files.sort();
        files
    })
    .await
    .map_err(|e| IngestionError::Io(e.to_string()))
}
