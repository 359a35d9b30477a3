use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document, SourceFile};

pub struct PlainTextAdapter;

#[async_trait]
impl FileLoader for PlainTextAdapter {
    async fn load(&self, data: &[u8], file: &SourceFile) -> Result<Vec<Document>, FileLoaderError> {
        if file.content_type != ContentType::Text {
            return Err(FileLoaderError::UnsupportedContentType(
                file.content_type.as_mime().to_string(),
            ));
        }

        let text = String::from_utf8(data.to_vec())
            .map_err(|e| FileLoaderError::ExtractionFailed(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(FileLoaderError::NoTextFound(file.filename.clone()));
        }

        Ok(vec![Document::new(text, file.metadata(None))])
    }
}
