use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use super::QuestionRequest;
use crate::error::{ApiError, ApiResult};
use crate::pipeline::AnswerResult;
use crate::state::AppState;

/// Answer a question with retrieval-augmented generation.
///
/// Embeds the question, retrieves the nearest documents from the vector
/// index, and conditions a chat completion on the assembled context. The
/// 200 body carries the generated answer plus the source identifier of
/// every retrieved document, in rank order.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuestionRequest>,
) -> ApiResult<Json<AnswerResult>> {
    if request.question.is_empty() {
        return Err(ApiError::MissingQuestion);
    }

    let result = state.pipeline.run(&request.question).await?;
    Ok(Json(result))
}
