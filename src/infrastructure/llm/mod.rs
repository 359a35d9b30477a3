mod client_factory;
mod openai_chat_client;
mod openai_embedder;

pub use client_factory::{ClientFactory, ClientFactoryError};
pub use openai_chat_client::OpenAiChatClient;
pub use openai_embedder::{OPENAI_BASE_URL, OpenAiEmbedder};
