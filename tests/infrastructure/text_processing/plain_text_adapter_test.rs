use ragline::application::ports::{FileLoader, FileLoaderError};
use ragline::domain::{ContentType, SourceFile};
use ragline::infrastructure::text_processing::PlainTextAdapter;

fn text_file(size: usize) -> SourceFile {
    SourceFile::new(
        "notes.txt".to_string(),
        "/corpus/notes.txt".to_string(),
        ContentType::Text,
        size as u64,
    )
}

#[tokio::test]
async fn given_utf8_text_when_loading_then_returns_single_document_without_page() {
    let data = "Héllo wörld".as_bytes();

    let documents = PlainTextAdapter.load(data, &text_file(data.len())).await.unwrap();

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].text, "Héllo wörld");
    assert_eq!(documents[0].metadata.file_type, "txt");
    assert_eq!(documents[0].metadata.page, None);
}

#[tokio::test]
async fn given_invalid_utf8_when_loading_then_returns_extraction_failed() {
    let result = PlainTextAdapter.load(&[0xc3, 0x28], &text_file(2)).await;

    assert!(matches!(result, Err(FileLoaderError::ExtractionFailed(_))));
}

#[tokio::test]
async fn given_whitespace_only_file_when_loading_then_returns_no_text_found() {
    let result = PlainTextAdapter.load(b" \n\t ", &text_file(4)).await;

    assert!(matches!(result, Err(FileLoaderError::NoTextFound(_))));
}

#[tokio::test]
async fn given_non_text_content_type_when_loading_then_returns_unsupported() {
    let file = SourceFile::new(
        "a.pdf".to_string(),
        "a.pdf".to_string(),
        ContentType::Pdf,
        1,
    );

    let result = PlainTextAdapter.load(b"x", &file).await;

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}
