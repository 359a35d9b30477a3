use std::io::{Cursor, Read};

use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document, SourceFile};

use super::text_sanitizer::sanitize_extracted_text;

const DOCUMENT_PART: &str = "word/document.xml";

/// Reads the main document part of a WordprocessingML package.
pub struct DocxAdapter;

impl DocxAdapter {
    fn read_document_xml(data: Vec<u8>) -> Result<String, FileLoaderError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("invalid DOCX archive: {e}")))?;

        let mut part = archive.by_name(DOCUMENT_PART).map_err(|_| {
            FileLoaderError::ExtractionFailed(format!("{DOCUMENT_PART} missing from DOCX"))
        })?;

        let mut xml = String::new();
        part.read_to_string(&mut xml).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to read {DOCUMENT_PART}: {e}"))
        })?;

        Ok(xml)
    }
}

/// Collects the text runs (`w:t`) of a `document.xml`, starting a new line
/// for every paragraph and honouring explicit tabs and breaks.
pub fn extract_docx_text(xml: &str) -> String {
    let mut text = String::new();
    let mut in_text_run = false;
    let mut rest = xml;

    while let Some(open) = rest.find('<') {
        if in_text_run {
            text.push_str(&decode_entities(&rest[..open]));
        }

        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let tag = &rest[open + 1..open + close];
        rest = &rest[open + close + 1..];

        let self_closing = tag.ends_with('/');
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("");
        let closing = tag.starts_with('/');

        match name {
            "w:t" if !closing && !self_closing => in_text_run = true,
            "w:t" if closing => in_text_run = false,
            "w:p" if !closing => {
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }
            }
            "w:tab" => text.push('\t'),
            "w:br" | "w:cr" => text.push('\n'),
            _ => {}
        }
    }

    text
}

fn decode_entities(raw: &str) -> String {
    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        let after = &rest[amp..];

        let Some(semi) = after.find(';') else {
            decoded.push_str(after);
            return decoded;
        };

        let entity = &after[1..semi];
        let replacement = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };

        match replacement {
            Some(c) => {
                decoded.push(c);
                rest = &after[semi + 1..];
            }
            None => {
                decoded.push('&');
                rest = &after[1..];
            }
        }
    }

    decoded.push_str(rest);
    decoded
}

#[async_trait]
impl FileLoader for DocxAdapter {
    #[tracing::instrument(
        skip(self, data, file),
        fields(document_id = %file.id.as_uuid(), filename = %file.filename)
    )]
    async fn load(&self, data: &[u8], file: &SourceFile) -> Result<Vec<Document>, FileLoaderError> {
        if file.content_type != ContentType::Docx {
            return Err(FileLoaderError::UnsupportedContentType(
                file.content_type.as_mime().to_string(),
            ));
        }

        let bytes = data.to_vec();
        let xml = tokio::task::spawn_blocking(move || Self::read_document_xml(bytes))
            .await
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("task join error: {e}")))??;

        let text = sanitize_extracted_text(&extract_docx_text(&xml));
        tracing::info!(chars = text.chars().count(), "DOCX text extraction complete");

        if text.is_empty() {
            return Err(FileLoaderError::NoTextFound(file.filename.clone()));
        }

        Ok(vec![Document::new(text, file.metadata(None))])
    }
}
