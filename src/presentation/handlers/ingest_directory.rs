use std::path::PathBuf;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::services::IngestionFailure;
use crate::presentation::state::AppState;

use super::error::{error_response, ingestion_error_status};

#[derive(Deserialize)]
pub struct IngestDirectoryRequest {
    pub directory_path: String,
}

#[derive(Serialize)]
pub struct FailureBody {
    pub file: String,
    pub error: String,
}

#[derive(Serialize)]
pub struct IngestDirectoryResponse {
    pub message: String,
    pub documents_processed: usize,
    pub chunks_created: usize,
    pub files_ingested: usize,
    pub failures: Vec<FailureBody>,
}

impl From<IngestionFailure> for FailureBody {
    fn from(failure: IngestionFailure) -> Self {
        Self {
            file: failure.file,
            error: failure.error,
        }
    }
}

#[tracing::instrument(skip(state, request), fields(directory = %request.directory_path))]
pub async fn ingest_directory_handler(
    State(state): State<AppState>,
    Json(request): Json<IngestDirectoryRequest>,
) -> impl IntoResponse {
    let directory = PathBuf::from(request.directory_path.trim());

    match state.ingestion_service.ingest_directory(&directory).await {
        Ok(report) => (
            StatusCode::OK,
            Json(IngestDirectoryResponse {
                message: format!(
                    "Successfully ingested documents from {}",
                    directory.display()
                ),
                documents_processed: report.documents_processed,
                chunks_created: report.chunks_created,
                files_ingested: report.files_ingested,
                failures: report.failures.into_iter().map(FailureBody::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => {
            let status = ingestion_error_status(&e);
            tracing::error!(error = %e, status = %status, "Directory ingestion failed");
            error_response(status, format!("Ingestion error: {}", e))
        }
    }
}
