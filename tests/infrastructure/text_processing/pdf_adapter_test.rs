use ragline::application::ports::{FileLoader, FileLoaderError};
use ragline::domain::{ContentType, SourceFile};
use ragline::infrastructure::text_processing::PdfAdapter;

fn pdf_file() -> SourceFile {
    SourceFile::new(
        "broken.pdf".to_string(),
        "/corpus/broken.pdf".to_string(),
        ContentType::Pdf,
        0,
    )
}

#[tokio::test]
async fn given_garbage_bytes_when_loading_pdf_then_returns_extraction_failed() {
    let result = PdfAdapter::new()
        .load(b"%PDF-1.4 definitely not a real document", &pdf_file())
        .await;

    assert!(matches!(result, Err(FileLoaderError::ExtractionFailed(_))));
}

#[tokio::test]
async fn given_text_content_type_when_loading_with_pdf_adapter_then_returns_unsupported() {
    let file = SourceFile::new(
        "a.txt".to_string(),
        "a.txt".to_string(),
        ContentType::Text,
        1,
    );

    let result = PdfAdapter::new().load(b"x", &file).await;

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}
