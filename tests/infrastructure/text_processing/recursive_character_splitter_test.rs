use ragline::application::ports::{TextSplitter, TextSplitterError};
use ragline::domain::{ContentType, Document, SourceFile};
use ragline::infrastructure::text_processing::RecursiveCharacterSplitter;

fn document(text: &str) -> Document {
    let file = SourceFile::new(
        "doc.txt".to_string(),
        "/corpus/doc.txt".to_string(),
        ContentType::Text,
        text.len() as u64,
    );
    Document::new(text.to_string(), file.metadata(None))
}

#[test]
fn given_words_without_overlap_when_splitting_then_packs_words_up_to_size() {
    let splitter = RecursiveCharacterSplitter::new(10, 0);

    let chunks = splitter.split_text("aaaa bbbb cccc dddd").unwrap();

    assert_eq!(chunks, vec!["aaaa bbbb", "cccc dddd"]);
}

#[test]
fn given_words_with_overlap_when_splitting_then_neighbouring_chunks_share_words() {
    let splitter = RecursiveCharacterSplitter::new(10, 5);

    let chunks = splitter.split_text("aaaa bbbb cccc dddd").unwrap();

    assert_eq!(chunks, vec!["aaaa bbbb", "bbbb cccc", "cccc dddd"]);
}

#[test]
fn given_overlap_smaller_than_word_with_separator_when_splitting_then_no_words_are_shared() {
    let splitter = RecursiveCharacterSplitter::new(10, 4);

    let chunks = splitter.split_text("aaaa bbbb cccc dddd").unwrap();

    assert_eq!(chunks, vec!["aaaa bbbb", "cccc dddd"]);
}

#[test]
fn given_whitespace_runs_when_splitting_then_inner_whitespace_is_preserved() {
    let splitter = RecursiveCharacterSplitter::new(100, 10);
    let text = "alpha   beta\n\n\n\ngamma\t\tdelta";

    let chunks = splitter.split_text(text).unwrap();

    assert_eq!(chunks, vec![text]);
}

#[test]
fn given_text_without_separators_when_splitting_then_falls_back_to_characters() {
    let splitter = RecursiveCharacterSplitter::new(4, 0);

    let chunks = splitter.split_text("abcdefghij").unwrap();

    assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
}

#[test]
fn given_character_fallback_with_overlap_when_splitting_then_windows_overlap() {
    let splitter = RecursiveCharacterSplitter::new(4, 1);

    let chunks = splitter.split_text("abcdefghij").unwrap();

    assert_eq!(chunks, vec!["abcd", "defg", "ghij"]);
}

#[test]
fn given_short_paragraphs_when_splitting_then_keeps_them_in_one_chunk() {
    let splitter = RecursiveCharacterSplitter::new(100, 10);

    let chunks = splitter.split_text("para one\n\npara two").unwrap();

    assert_eq!(chunks, vec!["para one\n\npara two"]);
}

#[test]
fn given_multibyte_text_when_splitting_then_size_is_counted_in_characters() {
    let splitter = RecursiveCharacterSplitter::new(3, 0);

    let chunks = splitter.split_text("äöüßéè").unwrap();

    assert_eq!(chunks, vec!["äöü", "ßéè"]);
}

#[test]
fn given_blank_text_when_splitting_then_returns_no_chunks() {
    let splitter = RecursiveCharacterSplitter::new(10, 2);

    assert!(splitter.split_text("  \n\n  ").unwrap().is_empty());
}

#[test]
fn given_overlap_not_smaller_than_size_when_splitting_then_returns_configuration_error() {
    let result = RecursiveCharacterSplitter::new(10, 10).split_text("text");

    assert!(matches!(
        result,
        Err(TextSplitterError::InvalidConfiguration(_))
    ));
}

#[test]
fn given_zero_size_when_splitting_then_returns_configuration_error() {
    let result = RecursiveCharacterSplitter::new(0, 0).split_text("text");

    assert!(matches!(
        result,
        Err(TextSplitterError::InvalidConfiguration(_))
    ));
}

#[test]
fn given_long_text_when_splitting_twice_then_output_is_identical() {
    let splitter = RecursiveCharacterSplitter::new(50, 10);
    let text = "Renewable energy comes from natural sources. ".repeat(20);

    assert_eq!(
        splitter.split_text(&text).unwrap(),
        splitter.split_text(&text).unwrap()
    );
}

#[test]
fn given_long_text_when_splitting_then_no_chunk_exceeds_size() {
    let splitter = RecursiveCharacterSplitter::new(50, 10);
    let text = "Renewable energy comes from natural sources.\nIt is replenished constantly.\n\n"
        .repeat(10);

    let chunks = splitter.split_text(&text).unwrap();

    assert!(chunks.len() > 1);
    assert!(chunks.iter().all(|c| c.chars().count() <= 50));
}

#[tokio::test]
async fn given_document_when_splitting_then_chunks_carry_metadata_indexes_and_offsets() {
    let splitter = RecursiveCharacterSplitter::new(10, 0);
    let doc = document("aaaa bbbb cccc dddd");

    let chunks = splitter.split(&doc, 5).await.unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].chunk_index, 5);
    assert_eq!(chunks[1].chunk_index, 6);
    assert_eq!(chunks[0].offset, 0);
    assert_eq!(chunks[1].offset, 10);
    assert_eq!(chunks[1].metadata.source, "doc.txt");
    assert_eq!(chunks[1].metadata.file_path, "/corpus/doc.txt");
}

#[tokio::test]
async fn given_repeated_text_when_splitting_then_offsets_point_at_each_chunk() {
    let splitter = RecursiveCharacterSplitter::new(7, 0);
    let doc = document("abc abc abc abc");

    let chunks = splitter.split(&doc, 0).await.unwrap();

    let offsets: Vec<usize> = chunks.iter().map(|c| c.offset).collect();
    assert_eq!(offsets, vec![0, 8, 12]);
    for chunk in &chunks {
        assert_eq!(&doc.text[chunk.offset..chunk.offset + chunk.text.len()], chunk.text);
    }
}

#[tokio::test]
async fn given_overlapping_chunks_when_splitting_then_every_chunk_is_a_slice_at_its_offset() {
    let splitter = RecursiveCharacterSplitter::new(40, 15);
    let doc = document(
        "Solar  panels convert sunlight.\nThey   produce direct current.\n\nInverters   convert it.",
    );

    let chunks = splitter.split(&doc, 0).await.unwrap();

    assert!(chunks.len() > 1);
    assert!(chunks.windows(2).all(|w| w[0].offset < w[1].offset));
    for chunk in &chunks {
        assert_eq!(&doc.text[chunk.offset..chunk.offset + chunk.text.len()], chunk.text);
    }
}
