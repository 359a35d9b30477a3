mod local_vector_store;
mod qdrant_adapter;
mod vector_store_factory;

pub use local_vector_store::LocalVectorStore;
pub use qdrant_adapter::QdrantAdapter;
pub use vector_store_factory::VectorStoreFactory;
