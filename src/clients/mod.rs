//! Upstream service clients
//!
//! Every network dependency of the answer pipeline sits behind a trait here:
//! embeddings, vector index queries, chat completions, and the legacy hosted
//! answers endpoint. Handlers and the pipeline receive already-configured
//! client handles through [`crate::state::AppState`], so tests can substitute
//! in-memory fakes without touching process configuration.

pub mod openai;
pub mod pinecone;

pub use openai::OpenAiClient;
pub use pinecone::PineconeClient;

use async_trait::async_trait;
use serde::Serialize;

use crate::pipeline::RetrievedDocument;

pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Failure talking to an upstream service.
///
/// The `Display` string is what callers see in the HTTP 500 body, so variants
/// carry the upstream message rather than summarizing it.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("{service} request failed: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },

    /// The service answered with a non-success status.
    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The response arrived but did not have the expected shape.
    #[error("{service} returned an unexpected response: {detail}")]
    Malformed {
        service: &'static str,
        detail: String,
    },

    /// Chat completion succeeded at the HTTP level but carried no choices.
    #[error("chat completion returned no choices")]
    NoChoices,

    /// The hosted answers endpoint returned an empty answer list.
    #[error("answers endpoint returned no answers")]
    NoAnswers,
}

/// Role tag for one conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged segment of a chat prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Turns text into a fixed-length vector via the embedding service.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    async fn embed(&self, model: &str, text: &str) -> UpstreamResult<Vec<f32>>;
}

/// Nearest-neighbor lookup against the vector index.
///
/// Returns at most `top_k` documents in the index's rank order. Zero matches
/// is a valid, empty result rather than an error.
#[async_trait]
pub trait VectorIndexClient: Send + Sync {
    async fn query(&self, vector: &[f32], top_k: usize) -> UpstreamResult<Vec<RetrievedDocument>>;
}

/// Chat-completion call returning the first choice's text content.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: Option<f32>,
    ) -> UpstreamResult<String>;
}

/// Query for the hosted answers endpoint, which does retrieval server-side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswersQuery {
    pub search_model: String,
    pub model: String,
    pub question: String,
    pub documents: Vec<String>,
    pub examples: Vec<[String; 2]>,
    pub max_rerank: usize,
    pub temperature: f32,
}

/// Legacy hosted answers endpoint.
#[async_trait]
pub trait AnswersClient: Send + Sync {
    async fn answers(&self, query: AnswersQuery) -> UpstreamResult<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_serializes_with_lowercase_role() {
        let msg = ChatMessage::system("context goes here");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "system");
        assert_eq!(value["content"], "context goes here");

        let msg = ChatMessage::user("what is neuroplasticity?");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "user");
    }

    #[test]
    fn upstream_error_display_carries_service_and_body() {
        let err = UpstreamError::Status {
            service: "embeddings",
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "embeddings returned HTTP 429: rate limited");

        let err = UpstreamError::Transport {
            service: "vector index",
            message: "connection refused".into(),
        };
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn no_choices_has_fixed_message() {
        assert_eq!(
            UpstreamError::NoChoices.to_string(),
            "chat completion returned no choices"
        );
    }
}
