const MAX_VISIBLE_CHARS: usize = 100;

const REDACTED_PREFIXES: [&str; 5] = [
    "Bearer ",
    "api_key=",
    "password=",
    "secret=",
    "token=",
];

/// Shortens user-supplied text for log fields and masks anything that looks like a credential.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total = trimmed.chars().count();
    let visible = if total > MAX_VISIBLE_CHARS {
        let head: String = trimmed.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{head}... ({total} chars total)")
    } else {
        trimmed.to_string()
    };

    redact_sensitive_patterns(&visible)
}

fn redact_sensitive_patterns(text: &str) -> String {
    let mut result = text.to_string();

    for prefix in REDACTED_PREFIXES {
        let mut search_from = 0;
        while let Some(found) = result[search_from..].find(prefix) {
            let value_start = search_from + found + prefix.len();
            let value_end = result[value_start..]
                .find(|c: char| c.is_whitespace() || matches!(c, '&' | '"' | '\'' | ','))
                .map(|i| value_start + i)
                .unwrap_or(result.len());

            result.replace_range(value_start..value_end, "[REDACTED]");
            search_from = value_start + "[REDACTED]".len();
        }
    }

    result
}
