use uuid::Uuid;

use super::document::DocumentMetadata;

#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub id: ChunkId,
    pub text: String,
    pub metadata: DocumentMetadata,
    pub chunk_index: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId(Uuid);

impl ChunkId {
    /// Stable id for the `chunk_index`-th chunk of the file at `file_path`.
    pub fn derive(file_path: &str, chunk_index: usize) -> Self {
        let name = format!("{file_path}#{chunk_index}");
        Self(Uuid::new_v5(&Uuid::NAMESPACE_URL, name.as_bytes()))
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Chunk {
    pub fn new(text: String, metadata: DocumentMetadata, chunk_index: usize, offset: usize) -> Self {
        Self {
            id: ChunkId::derive(&metadata.file_path, chunk_index),
            text,
            metadata,
            chunk_index,
            offset,
        }
    }

    pub fn source(&self) -> &str {
        &self.metadata.source
    }

    pub fn page(&self) -> Option<u32> {
        self.metadata.page
    }
}
