use std::path::Path;

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Pdf,
    Docx,
    Text,
}

impl ContentType {
    pub const SUPPORTED_EXTENSIONS: [&'static str; 3] = ["pdf", "docx", "txt"];

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(Self::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Docx)
            }
            m if m.starts_with("text/plain") => Some(Self::Text),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Text => "text/plain",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Text => "txt",
        }
    }
}

/// A file handed to the loader, before any text has been extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub id: DocumentId,
    pub filename: String,
    pub file_path: String,
    pub content_type: ContentType,
    pub size_bytes: u64,
}

impl SourceFile {
    pub fn new(
        filename: String,
        file_path: String,
        content_type: ContentType,
        size_bytes: u64,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            filename,
            file_path,
            content_type,
            size_bytes,
        }
    }

    pub fn metadata(&self, page: Option<u32>) -> DocumentMetadata {
        DocumentMetadata {
            source: self.filename.clone(),
            file_type: self.content_type.extension().to_string(),
            file_path: self.file_path.clone(),
            page,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMetadata {
    pub source: String,
    pub file_type: String,
    pub file_path: String,
    /// 1-based page number, only set for paginated formats.
    pub page: Option<u32>,
}

/// Extracted text of one file, or of one page for PDFs.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub text: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(text: String, metadata: DocumentMetadata) -> Self {
        Self { text, metadata }
    }
}
