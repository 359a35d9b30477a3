use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use ragline::application::ports::ConversationMemory;
use ragline::application::services::{IngestionService, RagService, ServiceMetrics};
use ragline::infrastructure::llm::ClientFactory;
use ragline::infrastructure::memory::InMemoryConversationMemory;
use ragline::infrastructure::observability::{TracingConfig, init_tracing};
use ragline::infrastructure::persistence::VectorStoreFactory;
use ragline::infrastructure::text_processing::{CompositeFileLoader, RecursiveCharacterSplitter};
use ragline::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    let environment = Environment::current().map_err(anyhow::Error::msg)?;

    init_tracing(
        TracingConfig::from_settings(environment, &settings.logging),
        settings.server.port,
    )?;

    let embedder = ClientFactory::create_embedder(&settings)?;
    let llm_client = ClientFactory::create_llm_client(&settings)?;
    let vector_store = VectorStoreFactory::create(&settings.vector_store).await?;

    let file_loader = Arc::new(CompositeFileLoader::with_default_adapters());
    let text_splitter = Arc::new(RecursiveCharacterSplitter::new(
        settings.chunking.chunk_size,
        settings.chunking.chunk_overlap,
    ));
    let metrics = Arc::new(ServiceMetrics::new());

    let ingestion_service = Arc::new(
        IngestionService::new(
            file_loader,
            text_splitter,
            Arc::clone(&embedder),
            Arc::clone(&vector_store),
            Arc::clone(&metrics),
        )
        .with_distance_metric(settings.vector_store.distance),
    );

    let mut rag_service = RagService::new(
        embedder,
        llm_client,
        vector_store,
        Arc::clone(&metrics),
        settings.retrieval.top_k,
    )
    .with_max_context_tokens(settings.retrieval.max_context_tokens);

    if settings.memory.enabled {
        let memory: Arc<dyn ConversationMemory> =
            Arc::new(InMemoryConversationMemory::new(settings.memory.max_messages));
        rag_service = rag_service.with_memory(memory);
    }

    let state = AppState {
        ingestion_service,
        rag_service: Arc::new(rag_service),
        metrics,
        max_upload_bytes: settings.max_upload_bytes(),
    };

    let router = create_router(state);

    let host: std::net::IpAddr = settings
        .server
        .host
        .parse()
        .with_context(|| format!("invalid server.host: {}", settings.server.host))?;
    let addr = SocketAddr::from((host, settings.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
