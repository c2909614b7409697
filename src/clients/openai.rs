//! OpenAI-compatible API client.
//!
//! One client covers the three calls the server makes against the platform:
//! `POST /embeddings`, `POST /chat/completions`, and the legacy
//! `POST /answers` endpoint. The HTTP client is injected so every instance
//! shares the process-wide connection pool.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{
    AnswersClient, AnswersQuery, ChatMessage, CompletionClient, EmbeddingClient, UpstreamError,
    UpstreamResult,
};

const EMBEDDINGS: &str = "embeddings";
const CHAT: &str = "chat completions";
const ANSWERS: &str = "answers";

#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        service: &'static str,
        path: &str,
        payload: Value,
    ) -> UpstreamResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| UpstreamError::Transport {
                service,
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                service,
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| UpstreamError::Malformed {
                service,
                detail: format!("invalid JSON body: {err}"),
            })
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingEntry>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingEntry {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnswersResponse {
    #[serde(default)]
    answers: Vec<String>,
}

#[async_trait]
impl EmbeddingClient for OpenAiClient {
    async fn embed(&self, model: &str, text: &str) -> UpstreamResult<Vec<f32>> {
        let payload = json!({ "model": model, "input": text });
        let response: EmbeddingResponse = self.post_json(EMBEDDINGS, "/embeddings", payload).await?;
        response
            .data
            .into_iter()
            .next()
            .map(|entry| entry.embedding)
            .ok_or(UpstreamError::Malformed {
                service: EMBEDDINGS,
                detail: "response contained no embedding data".to_string(),
            })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: Option<f32>,
    ) -> UpstreamResult<String> {
        let mut payload = json!({ "model": model, "messages": messages });
        if let Some(temperature) = temperature {
            payload["temperature"] = json!(temperature);
        }

        let response: CompletionResponse =
            self.post_json(CHAT, "/chat/completions", payload).await?;

        // The choices array can legitimately come back empty; index 0 must
        // not be assumed.
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(UpstreamError::NoChoices)
    }
}

#[async_trait]
impl AnswersClient for OpenAiClient {
    async fn answers(&self, query: AnswersQuery) -> UpstreamResult<Vec<String>> {
        let payload = json!({
            "search_model": query.search_model,
            "model": query.model,
            "question": query.question,
            "documents": query.documents,
            "examples": query.examples,
            "max_rerank": query.max_rerank,
            "temperature": query.temperature,
        });

        let response: AnswersResponse = self.post_json(ANSWERS, "/answers", payload).await?;
        Ok(response.answers)
    }
}
