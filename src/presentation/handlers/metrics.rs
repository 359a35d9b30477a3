use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

use super::error::error_response;

#[derive(Serialize)]
pub struct MetricsResponse {
    pub total_queries: u64,
    pub failed_queries: u64,
    pub avg_response_time_ms: f64,
    pub documents_indexed: u64,
    pub chunks_indexed: u64,
    pub uptime_seconds: u64,
}

pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let chunks_indexed = match state.ingestion_service.indexed_chunk_count().await {
        Ok(count) => count,
        Err(e) => {
            tracing::error!(error = %e, "Failed to count indexed chunks");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error reading metrics: {}", e),
            );
        }
    };

    let snapshot = state.metrics.snapshot();

    (
        StatusCode::OK,
        Json(MetricsResponse {
            total_queries: snapshot.total_queries,
            failed_queries: snapshot.failed_queries,
            avg_response_time_ms: snapshot.avg_response_time_ms,
            documents_indexed: snapshot.documents_ingested,
            chunks_indexed,
            uptime_seconds: snapshot.uptime_seconds,
        }),
    )
        .into_response()
}
