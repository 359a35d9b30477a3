use std::sync::Arc;

use crate::application::ports::{VectorStore, VectorStoreError};
use crate::presentation::config::{VectorStoreProvider, VectorStoreSettings};

use super::local_vector_store::LocalVectorStore;
use super::qdrant_adapter::QdrantAdapter;

pub struct VectorStoreFactory;

impl VectorStoreFactory {
    pub async fn create(
        settings: &VectorStoreSettings,
    ) -> Result<Arc<dyn VectorStore>, VectorStoreError> {
        match settings.provider {
            VectorStoreProvider::Local => {
                tracing::info!(persist_dir = %settings.persist_dir, "Opening local vector store");
                let store = LocalVectorStore::open(&settings.persist_dir).await?;
                Ok(Arc::new(store))
            }
            VectorStoreProvider::Qdrant => {
                tracing::info!(
                    url = %settings.qdrant_url,
                    collection = %settings.collection_name,
                    "Connecting to Qdrant"
                );
                let store =
                    QdrantAdapter::new(&settings.qdrant_url, settings.collection_name.clone())
                        .await?;
                Ok(Arc::new(store))
            }
        }
    }
}
