use ragline::application::services::count_tokens;

#[test]
fn given_empty_string_when_counting_then_returns_zero() {
    assert_eq!(count_tokens(""), 0);
}

#[test]
fn given_known_sentence_when_counting_then_returns_expected_count() {
    let result = count_tokens("Hello, world!");
    assert!(result > 0);
    assert!(result < 10);
}

#[test]
fn given_longer_text_when_counting_then_count_grows() {
    assert!(count_tokens(&"energy ".repeat(50)) > count_tokens("energy"));
}
