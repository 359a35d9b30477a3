use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static HYPHENATED_LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<head>\w)-[ \t]*\r?\n[ \t]*(?P<tail>\w)").unwrap());

/// Cleans text pulled out of binary formats: NFKC-normalises ligatures and
/// compatibility glyphs, re-joins words hyphenated across line breaks, drops
/// control characters, collapses runs of spaces and keeps at most one blank
/// line between paragraphs.
pub fn sanitize_extracted_text(raw: &str) -> String {
    let normalized: String = raw
        .nfkc()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();
    let joined = HYPHENATED_LINE_BREAK.replace_all(&normalized, "$head$tail");

    let mut paragraphs: Vec<Vec<String>> = vec![Vec::new()];
    for line in joined.lines() {
        let collapsed = collapse_whitespace(line);
        if collapsed.is_empty() {
            if paragraphs.last().is_some_and(|p| !p.is_empty()) {
                paragraphs.push(Vec::new());
            }
        } else if let Some(current) = paragraphs.last_mut() {
            current.push(collapsed);
        }
    }

    paragraphs
        .into_iter()
        .filter(|p| !p.is_empty())
        .map(|p| p.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Single-spaces `text` and trims it.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
