use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::{EmbedderError, FileLoaderError, LlmClientError};
use crate::application::services::{IngestionError, RagError};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

fn embedder_status(error: &EmbedderError) -> StatusCode {
    match error {
        EmbedderError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::BAD_GATEWAY,
    }
}

pub fn ingestion_error_status(error: &IngestionError) -> StatusCode {
    match error {
        IngestionError::UnsupportedFormat(_)
        | IngestionError::FileLoading(FileLoaderError::UnsupportedContentType(_)) => {
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        }
        IngestionError::FileLoading(_) => StatusCode::UNPROCESSABLE_ENTITY,
        IngestionError::Embedding(e) => embedder_status(e),
        IngestionError::NotADirectory(_) => StatusCode::BAD_REQUEST,
        IngestionError::NoDocumentsFound(_) => StatusCode::NOT_FOUND,
        IngestionError::Splitting(_) | IngestionError::Storage(_) | IngestionError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn rag_error_status(error: &RagError) -> StatusCode {
    match error {
        RagError::EmptyQuestion => StatusCode::BAD_REQUEST,
        RagError::Embedding(e) => embedder_status(e),
        RagError::Completion(LlmClientError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
        RagError::Completion(_) => StatusCode::BAD_GATEWAY,
        RagError::Search(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
