use ragline::infrastructure::observability::sanitize_prompt;

#[test]
fn given_empty_prompt_when_sanitizing_then_returns_empty_marker() {
    assert_eq!(sanitize_prompt(""), "[EMPTY]");
    assert_eq!(sanitize_prompt("   "), "[EMPTY]");
}

#[test]
fn given_short_prompt_when_sanitizing_then_returns_unchanged() {
    let prompt = "What is the capacity factor of offshore wind?";
    assert_eq!(sanitize_prompt(prompt), prompt);
}

#[test]
fn given_long_prompt_when_sanitizing_then_truncates_with_length() {
    let prompt = "a".repeat(150);
    let result = sanitize_prompt(&prompt);
    assert!(result.contains("... (150 chars total)"));
    assert!(result.starts_with(&"a".repeat(100)));
}

#[test]
fn given_long_multibyte_prompt_when_sanitizing_then_truncates_on_char_boundary() {
    let prompt = "é".repeat(120);
    let result = sanitize_prompt(&prompt);
    assert!(result.starts_with(&"é".repeat(100)));
    assert!(result.contains("(120 chars total)"));
}

#[test]
fn given_bearer_token_when_sanitizing_then_redacts_token() {
    let result = sanitize_prompt("Authorization: Bearer sk-abc123xyz");
    assert!(result.contains("Bearer [REDACTED]"));
    assert!(!result.contains("sk-abc123xyz"));
}

#[test]
fn given_repeated_secrets_when_sanitizing_then_redacts_every_occurrence() {
    let result = sanitize_prompt("token=one and later token=two");
    assert_eq!(result, "token=[REDACTED] and later token=[REDACTED]");
}

#[test]
fn given_password_when_sanitizing_then_redacts_password() {
    let result = sanitize_prompt("Login with password=hunter2");
    assert!(result.contains("password=[REDACTED]"));
    assert!(!result.contains("hunter2"));
}
