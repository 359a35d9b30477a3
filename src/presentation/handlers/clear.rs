use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

use super::error::error_response;

#[derive(Serialize)]
pub struct ClearResponse {
    pub message: String,
}

#[tracing::instrument(skip(state))]
pub async fn clear_store_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.ingestion_service.clear_index().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ClearResponse {
                message: "Vector store cleared successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to clear vector store");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error clearing vector store: {}", e),
            )
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn clear_memory_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.rag_service.clear_memory().await;
    (
        StatusCode::OK,
        Json(ClearResponse {
            message: "Conversation memory cleared".to_string(),
        }),
    )
}
