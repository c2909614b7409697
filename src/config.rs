//! Configuration.
//!
//! Loaded once at startup from an optional `neurogen` config file, then
//! overridden by `NEUROGEN`-prefixed environment variables with `__` as the
//! nesting separator (e.g. `NEUROGEN_OPENAI__API_KEY`). Every field has a
//! serde default so a bare environment still produces a runnable config.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level / env-filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OpenAI-compatible platform endpoint
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Vector index endpoint
    #[serde(default)]
    pub pinecone: PineconeConfig,

    /// Retrieval-augmented chat route knobs
    #[serde(default)]
    pub rag: RagConfig,

    /// Flat knowledge-base route knobs
    #[serde(default)]
    pub ask: AskConfig,

    /// Hosted answers route knobs
    #[serde(default)]
    pub answers: AnswersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAiConfig {
    /// API root, e.g. `https://api.openai.com/v1`
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Bearer token for the platform
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PineconeConfig {
    /// Index host URL, e.g. `https://my-index-abc123.svc.us-east1-gcp.pinecone.io`
    #[serde(default)]
    pub base_url: String,

    /// Value of the `Api-Key` header
    #[serde(default)]
    pub api_key: String,
}

/// Everything that varied across the original near-duplicate chat handlers,
/// gathered into one object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RagConfig {
    /// How many nearest documents to retrieve
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Chat-completion model for the final answer
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Embedding model for the question vector
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Persona instructions prepended to the assembled context in the
    /// system turn
    #[serde(default = "default_system_preamble")]
    pub system_preamble: String,

    /// Sampling temperature for the final completion. `None` leaves the
    /// service default in place.
    #[serde(default)]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AskConfig {
    /// Chat-completion model for the knowledge-base route
    #[serde(default = "default_ask_model")]
    pub chat_model: String,

    /// Flat knowledge-base file read once at startup. The route returns 500
    /// until one is configured.
    #[serde(default)]
    pub knowledge_base_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnswersConfig {
    /// Retrieval model used server-side by the answers endpoint
    #[serde(default = "default_search_model")]
    pub search_model: String,

    /// Generation model used by the answers endpoint
    #[serde(default = "default_answers_model")]
    pub model: String,

    /// How many retrieved chunks the endpoint reranks
    #[serde(default = "default_max_rerank")]
    pub max_rerank: usize,

    #[serde(default = "default_answers_temperature")]
    pub temperature: f32,

    /// JSON document list (`[{"id": ..., "text": ...}]`) read once at
    /// startup and forwarded with every answers request.
    #[serde(default)]
    pub documents_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            openai: OpenAiConfig::default(),
            pinecone: PineconeConfig::default(),
            rag: RagConfig::default(),
            ask: AskConfig::default(),
            answers: AnswersConfig::default(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            api_key: String::new(),
        }
    }
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
        }
    }
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            system_preamble: default_system_preamble(),
            temperature: None,
        }
    }
}

impl Default for AskConfig {
    fn default() -> Self {
        Self {
            chat_model: default_ask_model(),
            knowledge_base_path: None,
        }
    }
}

impl Default for AnswersConfig {
    fn default() -> Self {
        Self {
            search_model: default_search_model(),
            model: default_answers_model(),
            max_rerank: default_max_rerank(),
            temperature: default_answers_temperature(),
            documents_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from config files and environment variables
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("neurogen").required(false))
            .add_source(config::Environment::with_prefix("NEUROGEN").separator("__"));

        let config: AppConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_top_k() -> usize {
    3
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_system_preamble() -> String {
    "You are a cognitive health assistant. Use the following context to answer the user's question:"
        .to_string()
}

fn default_ask_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_search_model() -> String {
    "ada".to_string()
}

fn default_answers_model() -> String {
    "curie".to_string()
}

fn default_max_rerank() -> usize {
    3
}

fn default_answers_temperature() -> f32 {
    0.2
}
