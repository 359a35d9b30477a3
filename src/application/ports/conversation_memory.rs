use async_trait::async_trait;

use crate::domain::Message;

/// Short-term conversational state shared by follow-up questions.
#[async_trait]
pub trait ConversationMemory: Send + Sync {
    async fn history(&self) -> Vec<Message>;

    /// Records a question and its answer as one unit, so concurrent turns never interleave.
    async fn append_turn(&self, user: Message, assistant: Message);

    async fn clear(&self);

    async fn len(&self) -> usize;
}
