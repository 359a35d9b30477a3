mod chunk;
mod document;
mod embedding;
mod message;
mod message_role;

pub use chunk::{Chunk, ChunkId};
pub use document::{ContentType, Document, DocumentId, DocumentMetadata, SourceFile};
pub use embedding::Embedding;
pub use message::Message;
pub use message_role::MessageRole;
