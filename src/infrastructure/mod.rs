pub mod llm;
pub mod memory;
pub mod observability;
pub mod persistence;
pub mod text_processing;
