mod in_memory_conversation_memory;

pub use in_memory_conversation_memory::InMemoryConversationMemory;
