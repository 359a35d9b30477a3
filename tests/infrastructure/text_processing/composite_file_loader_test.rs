use std::sync::Arc;

use ragline::application::ports::{FileLoader, FileLoaderError};
use ragline::domain::{ContentType, SourceFile};
use ragline::infrastructure::text_processing::{CompositeFileLoader, PlainTextAdapter};

use crate::helpers::docx_bytes;

#[tokio::test]
async fn given_default_adapters_when_checking_support_then_all_formats_are_registered() {
    let loader = CompositeFileLoader::with_default_adapters();

    assert!(loader.supports(ContentType::Pdf));
    assert!(loader.supports(ContentType::Docx));
    assert!(loader.supports(ContentType::Text));
}

#[tokio::test]
async fn given_docx_file_when_loading_then_dispatches_to_docx_adapter() {
    let loader = CompositeFileLoader::with_default_adapters();
    let data = docx_bytes(&["Routed through the composite."]);
    let file = SourceFile::new(
        "a.docx".to_string(),
        "a.docx".to_string(),
        ContentType::Docx,
        data.len() as u64,
    );

    let documents = loader.load(&data, &file).await.unwrap();

    assert_eq!(documents[0].text, "Routed through the composite.");
}

#[tokio::test]
async fn given_unregistered_type_when_loading_then_returns_unsupported() {
    let text_adapter: Arc<dyn FileLoader> = Arc::new(PlainTextAdapter);
    let loader = CompositeFileLoader::new(vec![(ContentType::Text, text_adapter)]);
    let file = SourceFile::new(
        "a.pdf".to_string(),
        "a.pdf".to_string(),
        ContentType::Pdf,
        1,
    );

    let result = loader.load(b"%PDF", &file).await;

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}
