use std::sync::LazyLock;
use tiktoken_rs::CoreBPE;

static CL100K: LazyLock<CoreBPE> = LazyLock::new(|| {
    tiktoken_rs::cl100k_base().expect("Failed to initialize cl100k_base tokenizer")
});

/// Token count under the `cl100k_base` encoding used by the OpenAI chat and embedding models.
pub fn count_tokens(text: &str) -> usize {
    CL100K.encode_with_special_tokens(text).len()
}
