use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::QuestionRequest;
use crate::clients::ChatMessage;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Build the single system prompt for the knowledge-base route: persona,
/// the entire knowledge base, then the question.
pub fn build_kb_prompt(knowledge: &str, question: &str) -> String {
    format!(
        "You are NeurogenAI, an expert cognitive-health assistant.\n\
         Use the following KNOWLEDGE to answer as fully as possible:\n\
         \n\
         {knowledge}\n\
         \n\
         QUESTION: {question}"
    )
}

/// Answer a question by pasting the whole preloaded knowledge base into the
/// prompt. No retrieval round-trip; suitable while the knowledge base fits
/// comfortably in the model's context window.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuestionRequest>,
) -> ApiResult<Json<AskResponse>> {
    if request.question.is_empty() {
        return Err(ApiError::MissingQuestion);
    }

    let knowledge_base = state
        .knowledge_base
        .as_ref()
        .ok_or_else(|| ApiError::Corpus("no knowledge base configured".to_string()))?;

    let prompt = build_kb_prompt(&knowledge_base.text, &request.question);
    let answer = state
        .completion
        .complete(
            &state.config.ask.chat_model,
            &[ChatMessage::system(prompt)],
            None,
        )
        .await?;

    Ok(Json(AskResponse { answer }))
}
