use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::ConversationMemory;
use crate::domain::Message;

/// Process-wide conversation buffer that keeps the most recent `max_messages` turns.
pub struct InMemoryConversationMemory {
    messages: RwLock<VecDeque<Message>>,
    max_messages: usize,
}

impl InMemoryConversationMemory {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: RwLock::new(VecDeque::with_capacity(max_messages)),
            max_messages,
        }
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }
}

#[async_trait]
impl ConversationMemory for InMemoryConversationMemory {
    async fn history(&self) -> Vec<Message> {
        self.messages.read().await.iter().cloned().collect()
    }

    async fn append_turn(&self, user: Message, assistant: Message) {
        if self.max_messages == 0 {
            return;
        }

        let mut messages = self.messages.write().await;
        messages.push_back(user);
        messages.push_back(assistant);
        while messages.len() > self.max_messages {
            messages.pop_front();
        }
    }

    async fn clear(&self) {
        self.messages.write().await.clear();
    }

    async fn len(&self) -> usize {
        self.messages.read().await.len()
    }
}
