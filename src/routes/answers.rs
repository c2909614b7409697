use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::QuestionRequest;
use crate::clients::{AnswersQuery, UpstreamError};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AnswersResponse {
    pub answer: String,
}

/// Answer a question through the hosted answers endpoint.
///
/// The preloaded document list rides along with every request and the
/// endpoint does retrieval and reranking server-side; only the top answer
/// is returned to the caller.
pub async fn answers(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuestionRequest>,
) -> ApiResult<Json<AnswersResponse>> {
    if request.question.is_empty() {
        return Err(ApiError::MissingQuestion);
    }

    let documents = state
        .documents
        .as_ref()
        .ok_or_else(|| ApiError::Corpus("no document corpus configured".to_string()))?;

    let cfg = &state.config.answers;
    let query = AnswersQuery {
        search_model: cfg.search_model.clone(),
        model: cfg.model.clone(),
        question: request.question,
        documents: documents.texts(),
        examples: Vec::new(),
        max_rerank: cfg.max_rerank,
        temperature: cfg.temperature,
    };

    let mut found = state.answers.answers(query).await?;
    if found.is_empty() {
        return Err(ApiError::Upstream(UpstreamError::NoAnswers));
    }

    Ok(Json(AnswersResponse {
        answer: found.remove(0),
    }))
}
