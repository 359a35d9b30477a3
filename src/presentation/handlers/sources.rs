use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

use super::error::error_response;

#[derive(Serialize)]
pub struct SourcesResponse {
    pub sources: Vec<String>,
    pub count: usize,
}

pub async fn sources_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.ingestion_service.list_sources().await {
        Ok(sources) => (
            StatusCode::OK,
            Json(SourcesResponse {
                count: sources.len(),
                sources,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list sources");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error retrieving sources: {}", e),
            )
        }
    }
}
