use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

use super::error::{error_response, ingestion_error_status};

#[derive(Serialize)]
pub struct IngestResponse {
    pub message: String,
    pub documents_processed: usize,
    pub chunks_created: usize,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn ingest_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let field = loop {
        match multipart.next_field().await {
            Ok(Some(f)) if f.name() == Some("file") || f.file_name().is_some() => break f,
            Ok(Some(_)) => continue,
            Ok(None) => {
                tracing::warn!("Ingest request with no file");
                return error_response(StatusCode::BAD_REQUEST, "No file uploaded");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read multipart: {}", e),
                );
            }
        }
    };

    let filename = field.file_name().unwrap_or("unknown").to_string();
    let mime = field.content_type().map(str::to_string);

    tracing::debug!(filename = %filename, content_type = ?mime, "Processing file upload");

    let data = match field.bytes().await {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read file bytes");
            return error_response(StatusCode::BAD_REQUEST, format!("Failed to read file: {}", e));
        }
    };

    match state
        .ingestion_service
        .ingest_bytes(&data, &filename, mime.as_deref())
        .await
    {
        Ok(report) => {
            tracing::info!(
                filename = %filename,
                chunks = report.chunks_created,
                "Document ingested"
            );
            (
                StatusCode::OK,
                Json(IngestResponse {
                    message: format!("Successfully ingested {}", filename),
                    documents_processed: report.documents_processed,
                    chunks_created: report.chunks_created,
                }),
            )
                .into_response()
        }
        Err(e) => {
            let status = ingestion_error_status(&e);
            tracing::error!(filename = %filename, error = %e, status = %status, "Ingestion failed");
            error_response(status, format!("Ingestion error: {}", e))
        }
    }
}
