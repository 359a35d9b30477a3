use std::collections::VecDeque;
use std::ops::Range;

use async_trait::async_trait;

use crate::application::ports::{TextSplitter, TextSplitterError};
use crate::domain::{Chunk, Document};

const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits on paragraph, line, then word boundaries, falling back to single
/// characters, and greedily merges the pieces back into windows of at most
/// `chunk_size` characters that share up to `chunk_overlap` characters with
/// their predecessor.
///
/// Separators stay attached to the piece they precede, so every chunk is a
/// trimmed slice of the input and its byte offset is exact.
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveCharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn split_text(&self, text: &str) -> Result<Vec<String>, TextSplitterError> {
        Ok(self
            .split_ranges(text)?
            .into_iter()
            .map(|range| text[range].to_string())
            .collect())
    }

    /// Byte ranges of the chunks of `text`, in order.
    pub fn split_ranges(&self, text: &str) -> Result<Vec<Range<usize>>, TextSplitterError> {
        if self.chunk_size == 0 {
            return Err(TextSplitterError::InvalidConfiguration(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(TextSplitterError::InvalidConfiguration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        Ok(self.split_recursive(text, 0..text.len(), &DEFAULT_SEPARATORS))
    }

    fn split_recursive(
        &self,
        text: &str,
        range: Range<usize>,
        separators: &[&str],
    ) -> Vec<Range<usize>> {
        let (separator, finer) = pick_separator(&text[range.clone()], separators);

        let mut chunks = Vec::new();
        let mut pending: Vec<Range<usize>> = Vec::new();

        for piece in split_keeping_separator(text, range, separator) {
            if char_len(&text[piece.clone()]) < self.chunk_size {
                pending.push(piece);
                continue;
            }

            if !pending.is_empty() {
                chunks.extend(self.merge(text, &pending));
                pending.clear();
            }

            if finer.is_empty() {
                chunks.extend(trimmed(text, piece));
            } else {
                chunks.extend(self.split_recursive(text, piece, finer));
            }
        }

        if !pending.is_empty() {
            chunks.extend(self.merge(text, &pending));
        }

        chunks
    }

    /// Merges adjacent pieces into windows. Pieces are contiguous, so a window is one range.
    fn merge(&self, text: &str, pieces: &[Range<usize>]) -> Vec<Range<usize>> {
        let mut merged = Vec::new();
        let mut window: VecDeque<(Range<usize>, usize)> = VecDeque::new();
        let mut window_len = 0usize;

        for piece in pieces {
            let piece_len = char_len(&text[piece.clone()]);

            if window_len + piece_len > self.chunk_size && !window.is_empty() {
                merged.extend(window_range(&window).and_then(|r| trimmed(text, r)));

                while window_len > self.chunk_overlap
                    || (window_len + piece_len > self.chunk_size && window_len > 0)
                {
                    let Some((_, len)) = window.pop_front() else {
                        break;
                    };
                    window_len -= len;
                }
            }

            window.push_back((piece.clone(), piece_len));
            window_len += piece_len;
        }

        merged.extend(window_range(&window).and_then(|r| trimmed(text, r)));
        merged
    }
}

fn pick_separator<'a>(text: &str, separators: &'a [&'a str]) -> (&'a str, &'a [&'a str]) {
    for (i, separator) in separators.iter().enumerate() {
        if separator.is_empty() {
            return ("", &[]);
        }
        if text.contains(separator) {
            return (separator, &separators[i + 1..]);
        }
    }
    (separators.last().copied().unwrap_or(""), &[])
}

/// Cuts `range` before every occurrence of `separator`; an empty separator yields characters.
fn split_keeping_separator(text: &str, range: Range<usize>, separator: &str) -> Vec<Range<usize>> {
    let slice = &text[range.clone()];
    let base = range.start;

    let cuts: Vec<usize> = if separator.is_empty() {
        slice.char_indices().map(|(i, _)| i).collect()
    } else {
        slice.match_indices(separator).map(|(i, _)| i).collect()
    };

    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0usize;
    for cut in cuts.into_iter().chain(std::iter::once(slice.len())) {
        if cut > start {
            pieces.push(base + start..base + cut);
        }
        start = cut;
    }
    pieces
}

fn window_range(window: &VecDeque<(Range<usize>, usize)>) -> Option<Range<usize>> {
    let first = window.front()?;
    let last = window.back()?;
    Some(first.0.start..last.0.end)
}

/// `range` without surrounding whitespace, or `None` when nothing is left.
fn trimmed(text: &str, range: Range<usize>) -> Option<Range<usize>> {
    let slice = &text[range.clone()];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return None;
    }
    let start = range.start + (slice.len() - slice.trim_start().len());
    Some(start..start + trimmed.len())
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[async_trait]
impl TextSplitter for RecursiveCharacterSplitter {
    async fn split(
        &self,
        document: &Document,
        first_index: usize,
    ) -> Result<Vec<Chunk>, TextSplitterError> {
        let ranges = self.split_ranges(&document.text)?;

        Ok(ranges
            .into_iter()
            .enumerate()
            .map(|(i, range)| {
                let offset = range.start;
                Chunk::new(
                    document.text[range].to_string(),
                    document.metadata.clone(),
                    first_index + i,
                    offset,
                )
            })
            .collect())
    }
}
