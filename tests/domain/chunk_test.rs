use ragline::domain::{Chunk, ChunkId, ContentType, SourceFile};

fn metadata(path: &str) -> ragline::domain::DocumentMetadata {
    SourceFile::new("report.txt".to_string(), path.to_string(), ContentType::Text, 10).metadata(None)
}

#[test]
fn given_same_path_and_index_when_deriving_id_then_ids_match() {
    assert_eq!(
        ChunkId::derive("/data/report.txt", 3),
        ChunkId::derive("/data/report.txt", 3)
    );
}

#[test]
fn given_different_index_or_path_when_deriving_id_then_ids_differ() {
    let base = ChunkId::derive("/data/report.txt", 3);
    assert_ne!(base, ChunkId::derive("/data/report.txt", 4));
    assert_ne!(base, ChunkId::derive("/data/other.txt", 3));
}

#[test]
fn given_chunk_when_created_then_id_is_derived_from_file_path_and_index() {
    let chunk = Chunk::new("text".to_string(), metadata("/data/report.txt"), 7, 120);

    assert_eq!(chunk.id, ChunkId::derive("/data/report.txt", 7));
    assert_eq!(chunk.chunk_index, 7);
    assert_eq!(chunk.offset, 120);
    assert_eq!(chunk.source(), "report.txt");
    assert_eq!(chunk.page(), None);
}
