mod vector_store;

pub use vector_store::{LocalVectorStore, QdrantAdapter, VectorStoreFactory};
