use std::io::Write;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document, SourceFile};

use super::text_sanitizer::sanitize_extracted_text;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// One document per non-empty page, numbered from 1.
#[derive(Default)]
pub struct PdfAdapter;

impl PdfAdapter {
    pub fn new() -> Self {
        Self
    }

    fn extract_pages(path: &Path) -> Result<Vec<String>, FileLoaderError> {
        pdf_extract::extract_text_by_pages(path)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("failed to parse PDF: {e}")))
    }
}

#[async_trait]
impl FileLoader for PdfAdapter {
    #[tracing::instrument(
        skip(self, data, file),
        fields(document_id = %file.id.as_uuid(), filename = %file.filename)
    )]
    async fn load(&self, data: &[u8], file: &SourceFile) -> Result<Vec<Document>, FileLoaderError> {
        if file.content_type != ContentType::Pdf {
            return Err(FileLoaderError::UnsupportedContentType(
                file.content_type.as_mime().to_string(),
            ));
        }

        let mut temp_file = tempfile::NamedTempFile::new().map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to create temp file: {e}"))
        })?;

        temp_file.write_all(data).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to write temp file: {e}"))
        })?;

        let temp_path = temp_file.path().to_path_buf();

        // A malformed PDF can make the parser panic; the join error turns that into a failure.
        let pages = tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || Self::extract_pages(&temp_path)),
        )
        .await
        .map_err(|_| FileLoaderError::ExtractionFailed("PDF extraction timed out".to_string()))?
        .map_err(|e| FileLoaderError::ExtractionFailed(format!("PDF parser aborted: {e}")))??;

        drop(temp_file);

        let documents: Vec<Document> = pages
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| {
                let text = sanitize_extracted_text(raw);
                (!text.is_empty())
                    .then(|| Document::new(text, file.metadata(Some(index as u32 + 1))))
            })
            .collect();

        tracing::info!(
            page_count = pages.len(),
            text_pages = documents.len(),
            "PDF text extraction complete"
        );

        if documents.is_empty() {
            return Err(FileLoaderError::NoTextFound(file.filename.clone()));
        }

        Ok(documents)
    }
}
