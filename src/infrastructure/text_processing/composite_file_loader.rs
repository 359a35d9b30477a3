use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document, SourceFile};

use super::{DocxAdapter, PdfAdapter, PlainTextAdapter};

/// Dispatches each file to the adapter registered for its content type.
pub struct CompositeFileLoader {
    adapters: HashMap<ContentType, Arc<dyn FileLoader>>,
}

impl CompositeFileLoader {
    pub fn new(adapters: Vec<(ContentType, Arc<dyn FileLoader>)>) -> Self {
        Self {
            adapters: adapters.into_iter().collect(),
        }
    }

    /// PDF, DOCX and plain text.
    pub fn with_default_adapters() -> Self {
        Self::new(vec![
            (ContentType::Pdf, Arc::new(PdfAdapter::new())),
            (ContentType::Docx, Arc::new(DocxAdapter)),
            (ContentType::Text, Arc::new(PlainTextAdapter)),
        ])
    }

    pub fn supports(&self, content_type: ContentType) -> bool {
        self.adapters.contains_key(&content_type)
    }
}

#[async_trait]
impl FileLoader for CompositeFileLoader {
    async fn load(&self, data: &[u8], file: &SourceFile) -> Result<Vec<Document>, FileLoaderError> {
        let adapter = self.adapters.get(&file.content_type).ok_or_else(|| {
            FileLoaderError::UnsupportedContentType(file.content_type.as_mime().to_string())
        })?;

        adapter.load(data, file).await
    }
}
