use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::services::{QueryResponse, SourceChunk};
use crate::domain::{Message, MessageRole};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::error::{error_response, rag_error_status};

#[derive(Deserialize)]
pub struct QueryRequest {
    pub question: String,
    #[serde(default)]
    pub chat_history: Option<Vec<HistoryMessage>>,
}

#[derive(Deserialize)]
pub struct HistoryMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct QueryResponseBody {
    pub question: String,
    pub answer: String,
    pub sources: Vec<SourceBody>,
}

#[derive(Serialize)]
pub struct SourceBody {
    pub content: String,
    pub source: String,
    pub page: Option<u32>,
    pub chunk_index: usize,
    pub score: f32,
}

impl From<SourceChunk> for SourceBody {
    fn from(source: SourceChunk) -> Self {
        Self {
            content: source.content,
            source: source.source,
            page: source.page,
            chunk_index: source.chunk_index,
            score: source.score,
        }
    }
}

impl From<QueryResponse> for QueryResponseBody {
    fn from(response: QueryResponse) -> Self {
        Self {
            question: response.question,
            answer: response.answer,
            sources: response.sources.into_iter().map(SourceBody::from).collect(),
        }
    }
}

fn parse_history(history: Vec<HistoryMessage>) -> Result<Vec<Message>, String> {
    history
        .into_iter()
        .map(|m| {
            let role: MessageRole = m.role.parse()?;
            Ok(Message::new(role, m.content))
        })
        .collect()
}

#[tracing::instrument(skip(state, request))]
pub async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> impl IntoResponse {
    tracing::debug!(question = %sanitize_prompt(&request.question), "Processing query");

    let chat_history = match request.chat_history.map(parse_history).transpose() {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected chat history");
            return error_response(StatusCode::BAD_REQUEST, e);
        }
    };

    match state.rag_service.query(&request.question, chat_history).await {
        Ok(response) => {
            tracing::info!(sources_count = response.sources.len(), "Query successful");
            (StatusCode::OK, Json(QueryResponseBody::from(response))).into_response()
        }
        Err(e) => {
            let status = rag_error_status(&e);
            tracing::error!(error = %e, status = %status, "Query failed");
            error_response(status, format!("Query failed: {}", e))
        }
    }
}
