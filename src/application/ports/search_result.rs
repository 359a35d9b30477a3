use crate::domain::Chunk;

/// A retrieved chunk with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub score: f32,
}

impl SearchResult {
    pub fn new(chunk: Chunk, score: f32) -> Self {
        Self { chunk, score }
    }
}
