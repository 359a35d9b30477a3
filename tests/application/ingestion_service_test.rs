use ragline::application::ports::{FileLoaderError, VectorStore};
use ragline::application::services::IngestionError;

use crate::helpers::{TestHarness, counted, write_corpus, write_corrupt_docx};

const SOLAR_TEXT: &str = "aaaa bbbb cccc dddd";

#[tokio::test]
async fn given_known_text_when_ingesting_then_chunk_count_follows_size_and_overlap() {
    let harness = TestHarness::with_chunking(10, 5, false).await;

    let report = harness
        .ingestion_service
        .ingest_bytes(SOLAR_TEXT.as_bytes(), "letters.txt", None)
        .await
        .unwrap();

    assert_eq!(report.documents_processed, 1);
    assert_eq!(report.chunks_created, 3);
    assert_eq!(harness.vector_store.count().await.unwrap(), 3);
}

#[tokio::test]
async fn given_same_file_twice_when_ingesting_then_points_are_overwritten_not_duplicated() {
    let harness = TestHarness::with_chunking(10, 0, false).await;

    for _ in 0..2 {
        harness
            .ingestion_service
            .ingest_bytes(SOLAR_TEXT.as_bytes(), "letters.txt", None)
            .await
            .unwrap();
    }

    assert_eq!(harness.vector_store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn given_corpus_when_ingesting_directory_twice_then_counts_are_stable() {
    let corpus = tempfile::TempDir::new().unwrap();
    write_corpus(corpus.path());

    let first = TestHarness::with_chunking(40, 10, false).await;
    let second = TestHarness::with_chunking(40, 10, false).await;

    let a = first
        .ingestion_service
        .ingest_directory(corpus.path())
        .await
        .unwrap();
    let b = second
        .ingestion_service
        .ingest_directory(corpus.path())
        .await
        .unwrap();

    assert_eq!(a, b);
    assert_eq!(a.files_ingested, 3);
    assert!(a.failures.is_empty());
    assert!(a.chunks_created > a.files_ingested);
}

#[tokio::test]
async fn given_corrupt_file_in_directory_when_ingesting_then_failure_is_reported_and_rest_ingested()
 {
    let harness = TestHarness::new().await;
    let corpus = tempfile::TempDir::new().unwrap();
    write_corpus(corpus.path());
    write_corrupt_docx(corpus.path());

    let report = harness
        .ingestion_service
        .ingest_directory(corpus.path())
        .await
        .unwrap();

    assert_eq!(report.files_ingested, 3);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].file.ends_with("broken.docx"));
    assert!(report.failures[0].error.contains("extraction failed"));
}

#[tokio::test]
async fn given_only_corrupt_files_when_ingesting_directory_then_reports_all_failures() {
    let harness = TestHarness::new().await;
    let corpus = tempfile::TempDir::new().unwrap();
    write_corrupt_docx(corpus.path());

    let report = harness
        .ingestion_service
        .ingest_directory(corpus.path())
        .await
        .unwrap();

    assert_eq!(report.files_ingested, 0);
    assert_eq!(report.failures.len(), 1);
}

#[tokio::test]
async fn given_path_that_is_a_file_when_ingesting_directory_then_returns_not_a_directory() {
    let harness = TestHarness::new().await;
    let corpus = tempfile::TempDir::new().unwrap();
    let file = corpus.path().join("single.txt");
    std::fs::write(&file, "content").unwrap();

    let result = harness.ingestion_service.ingest_directory(&file).await;

    assert!(matches!(result, Err(IngestionError::NotADirectory(_))));
}

#[tokio::test]
async fn given_unknown_format_when_ingesting_bytes_then_returns_unsupported_format() {
    let harness = TestHarness::new().await;

    let result = harness
        .ingestion_service
        .ingest_bytes(b"<html></html>", "page.html", Some("text/html"))
        .await;

    assert!(matches!(result, Err(IngestionError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn given_invalid_utf8_text_when_ingesting_then_returns_extraction_failure() {
    let harness = TestHarness::new().await;

    let result = harness
        .ingestion_service
        .ingest_bytes(&[0xff, 0xfe, 0xfd], "binary.txt", None)
        .await;

    assert!(matches!(
        result,
        Err(IngestionError::FileLoading(FileLoaderError::ExtractionFailed(_)))
    ));
}

#[tokio::test]
async fn given_many_chunks_when_ingesting_then_embeds_in_a_single_batch_call() {
    let harness = TestHarness::with_chunking(10, 0, false).await;

    harness
        .ingestion_service
        .ingest_bytes("word ".repeat(40).as_bytes(), "words.txt", None)
        .await
        .unwrap();

    assert_eq!(counted(&harness.embedder.calls), 1);
}

#[tokio::test]
async fn given_cleared_index_when_ingesting_again_then_collection_is_recreated() {
    let harness = TestHarness::new().await;
    harness
        .ingestion_service
        .ingest_bytes(b"first document", "first.txt", None)
        .await
        .unwrap();

    harness.ingestion_service.clear_index().await.unwrap();
    assert!(!harness.vector_store.collection_exists().await.unwrap());
    assert!(harness.ingestion_service.list_sources().await.unwrap().is_empty());

    harness
        .ingestion_service
        .ingest_bytes(b"second document", "second.txt", None)
        .await
        .unwrap();

    assert_eq!(
        harness.ingestion_service.list_sources().await.unwrap(),
        vec!["second.txt".to_string()]
    );
    assert_eq!(harness.ingestion_service.indexed_chunk_count().await.unwrap(), 1);
}

#[tokio::test]
async fn given_multi_paragraph_file_when_ingesting_then_chunk_indexes_are_sequential() {
    let harness = TestHarness::with_chunking(30, 0, false).await;
    let text = "First paragraph about solar power.\n\nSecond paragraph about wind power.";

    harness
        .ingestion_service
        .ingest_bytes(text.as_bytes(), "energy.txt", None)
        .await
        .unwrap();

    let results = harness
        .vector_store
        .search(&crate::helpers::HashingEmbedder::vector("solar wind"), 10)
        .await
        .unwrap();

    let mut indexes: Vec<usize> = results.iter().map(|r| r.chunk.chunk_index).collect();
    indexes.sort();
    assert_eq!(indexes, (0..results.len()).collect::<Vec<_>>());
    assert!(results.len() >= 2);
}

#[tokio::test]
async fn given_file_reingested_with_fewer_chunks_when_ingesting_then_stale_chunks_are_removed() {
    let harness = TestHarness::with_chunking(10, 0, false).await;
    let service = &harness.ingestion_service;

    service
        .ingest_bytes(b"aaaa bbbb cccc dddd eeee ffff", "doc.txt", None)
        .await
        .unwrap();
    assert_eq!(harness.vector_store.count().await.unwrap(), 3);

    service
        .ingest_bytes(b"zzzz", "doc.txt", None)
        .await
        .unwrap();

    assert_eq!(harness.vector_store.count().await.unwrap(), 1);
    let results = harness
        .vector_store
        .search(&crate::helpers::HashingEmbedder::vector("aaaa cccc eeee"), 10)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk.text, "zzzz");
}

#[tokio::test]
async fn given_other_file_when_reingesting_one_file_then_other_file_is_kept() {
    let harness = TestHarness::with_chunking(10, 0, false).await;
    let service = &harness.ingestion_service;

    service
        .ingest_bytes(b"aaaa bbbb", "first.txt", None)
        .await
        .unwrap();
    service
        .ingest_bytes(b"cccc dddd", "second.txt", None)
        .await
        .unwrap();
    service
        .ingest_bytes(b"eeee", "first.txt", None)
        .await
        .unwrap();

    assert_eq!(harness.vector_store.count().await.unwrap(), 2);
    assert_eq!(
        service.list_sources().await.unwrap(),
        vec!["first.txt", "second.txt"]
    );
}

#[tokio::test]
async fn given_equivalent_directory_paths_when_ingesting_twice_then_points_are_not_duplicated() {
    let harness = TestHarness::with_chunking(40, 10, false).await;
    let corpus = tempfile::TempDir::new().unwrap();
    write_corpus(corpus.path());

    harness
        .ingestion_service
        .ingest_directory(corpus.path())
        .await
        .unwrap();
    let first = harness.vector_store.count().await.unwrap();

    harness
        .ingestion_service
        .ingest_directory(&corpus.path().join("."))
        .await
        .unwrap();
    harness
        .ingestion_service
        .ingest_path(&corpus.path().join("nested").join("..").join("solar.txt"))
        .await
        .unwrap();

    assert_eq!(harness.vector_store.count().await.unwrap(), first);
}
