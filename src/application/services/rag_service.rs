use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::application::ports::{
    ChatMessage, ConversationMemory, Embedder, EmbedderError, LlmClient, LlmClientError,
    SearchResult, VectorStore, VectorStoreError,
};
use crate::domain::{Message, MessageRole};
use crate::infrastructure::observability::sanitize_prompt;

use super::{ServiceMetrics, count_tokens};

pub const NO_CONTEXT_ANSWER: &str = "No relevant context found.";

const CONDENSE_QUESTION_TEMPLATE: &str = "Given the following conversation and a follow up question, rephrase the follow up question to be a standalone question, in its original language.

Chat History:
{chat_history}
Follow Up Input: {question}
Standalone question:";

const ANSWER_SYSTEM_TEMPLATE: &str = "Use the following pieces of context to answer the user's question.
If you don't know the answer, just say that you don't know, don't try to make up an answer.
----------------
{context}";

const CONTEXT_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub question: String,
    pub answer: String,
    pub sources: Vec<SourceChunk>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceChunk {
    pub content: String,
    pub source: String,
    pub page: Option<u32>,
    pub chunk_index: usize,
    pub score: f32,
}

impl From<SearchResult> for SourceChunk {
    fn from(result: SearchResult) -> Self {
        Self {
            content: result.chunk.text,
            source: result.chunk.metadata.source,
            page: result.chunk.metadata.page,
            chunk_index: result.chunk.chunk_index,
            score: result.score,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("question must not be empty")]
    EmptyQuestion,
    #[error("embedding: {0}")]
    Embedding(#[from] EmbedderError),
    #[error("search: {0}")]
    Search(#[from] VectorStoreError),
    #[error("completion: {0}")]
    Completion(#[from] LlmClientError),
}

/// Retrieval-augmented question answering with optional follow-up condensation.
pub struct RagService {
    embedder: Arc<dyn Embedder>,
    llm_client: Arc<dyn LlmClient>,
    vector_store: Arc<dyn VectorStore>,
    memory: Option<Arc<dyn ConversationMemory>>,
    metrics: Arc<ServiceMetrics>,
    top_k: usize,
    max_context_tokens: usize,
}

impl RagService {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        llm_client: Arc<dyn LlmClient>,
        vector_store: Arc<dyn VectorStore>,
        metrics: Arc<ServiceMetrics>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            llm_client,
            vector_store,
            memory: None,
            metrics,
            top_k,
            max_context_tokens: usize::MAX,
        }
    }

    pub fn with_memory(mut self, memory: Arc<dyn ConversationMemory>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_max_context_tokens(mut self, max_context_tokens: usize) -> Self {
        self.max_context_tokens = max_context_tokens;
        self
    }

    /// Answers `question`. Explicit `chat_history` replaces the shared memory for this call
    /// and leaves it untouched.
    #[instrument(skip(self, question, chat_history), fields(question = %sanitize_prompt(question)))]
    pub async fn query(
        &self,
        question: &str,
        chat_history: Option<Vec<Message>>,
    ) -> Result<QueryResponse, RagError> {
        let started = Instant::now();
        let result = self.answer(question, chat_history).await;
        self.metrics.record_query(started.elapsed(), result.is_ok());

        if let Ok(response) = &result {
            info!(
                sources = response.sources.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "query_answered"
            );
        }
        result
    }

    pub async fn clear_memory(&self) {
        if let Some(memory) = &self.memory {
            memory.clear().await;
            info!("conversation_memory_cleared");
        }
    }

    pub async fn memory_len(&self) -> usize {
        match &self.memory {
            Some(memory) => memory.len().await,
            None => 0,
        }
    }

    async fn answer(
        &self,
        question: &str,
        chat_history: Option<Vec<Message>>,
    ) -> Result<QueryResponse, RagError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RagError::EmptyQuestion);
        }

        let (history, use_memory) = match (chat_history, &self.memory) {
            (Some(explicit), _) => (explicit, false),
            (None, Some(memory)) => (memory.history().await, true),
            (None, None) => (Vec::new(), false),
        };

        let standalone = if history.is_empty() {
            question.to_string()
        } else {
            self.condense_question(&history, question).await?
        };

        let query_embedding = self.embedder.embed(&standalone).await?;
        let results = self
            .vector_store
            .search(&query_embedding, self.top_k)
            .await?;

        let (answer, sources) = if results.is_empty() {
            (NO_CONTEXT_ANSWER.to_string(), Vec::new())
        } else {
            let selected = self.fit_context(results);
            let context = selected
                .iter()
                .map(|r| r.chunk.text.as_str())
                .collect::<Vec<_>>()
                .join(CONTEXT_SEPARATOR);

            let messages = [
                ChatMessage::system(ANSWER_SYSTEM_TEMPLATE.replace("{context}", &context)),
                ChatMessage::user(standalone.as_str()),
            ];
            let answer = self.llm_client.complete(&messages).await?;
            (answer, selected.into_iter().map(SourceChunk::from).collect())
        };

        if use_memory {
            if let Some(memory) = &self.memory {
                memory
                    .append_turn(Message::user(question), Message::assistant(answer.as_str()))
                    .await;
            }
        }

        Ok(QueryResponse {
            question: question.to_string(),
            answer,
            sources,
        })
    }

    async fn condense_question(
        &self,
        history: &[Message],
        question: &str,
    ) -> Result<String, RagError> {
        let transcript = history
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| match m.role {
                MessageRole::User => format!("Human: {}", m.content),
                _ => format!("Assistant: {}", m.content),
            })
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = CONDENSE_QUESTION_TEMPLATE
            .replace("{chat_history}", &transcript)
            .replace("{question}", question);

        let condensed = self
            .llm_client
            .complete(&[ChatMessage::user(prompt)])
            .await?;
        let condensed = condensed.trim();

        debug!(standalone = %sanitize_prompt(condensed), "question_condensed");

        if condensed.is_empty() {
            Ok(question.to_string())
        } else {
            Ok(condensed.to_string())
        }
    }

    /// Keeps retrieved chunks in rank order until the token budget is spent; the best one always stays.
    fn fit_context(&self, results: Vec<SearchResult>) -> Vec<SearchResult> {
        let separator_tokens = count_tokens(CONTEXT_SEPARATOR);
        let mut used = 0usize;
        let mut selected = Vec::with_capacity(results.len());

        for result in results {
            let cost = count_tokens(&result.chunk.text)
                + if selected.is_empty() { 0 } else { separator_tokens };

            if !selected.is_empty() && used + cost > self.max_context_tokens {
                break;
            }
            used += cost;
            selected.push(result);
        }

        selected
    }
}
