use std::sync::Arc;
use std::time::Duration;

use crate::clients::{
    AnswersClient, CompletionClient, EmbeddingClient, OpenAiClient, PineconeClient,
    VectorIndexClient,
};
use crate::config::AppConfig;
use crate::corpus::{DocumentSet, KnowledgeBase};
use crate::pipeline::RagPipeline;

/// Shared application state.
///
/// Built once at startup and cloned into every handler. Clients and the
/// preloaded corpus are read-only; all per-request data lives in the
/// handlers themselves.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,

    /// The retrieval-augmented answer pipeline behind `/api/chat`
    pub pipeline: Arc<RagPipeline>,

    /// Chat-completion handle for the knowledge-base route
    pub completion: Arc<dyn CompletionClient>,

    /// Hosted answers handle
    pub answers: Arc<dyn AnswersClient>,

    /// Flat knowledge-base text, when configured
    pub knowledge_base: Option<Arc<KnowledgeBase>>,

    /// Document list for the answers route, when configured
    pub documents: Option<Arc<DocumentSet>>,
}

impl AppState {
    /// Build state with real clients from configuration.
    ///
    /// One pooled HTTP client backs every upstream call. Corpus files named
    /// in the config are loaded here, once; a missing or malformed file
    /// fails startup rather than the first request that needs it.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(32)
            .build()?;

        let openai = Arc::new(OpenAiClient::new(
            http.clone(),
            &config.openai.base_url,
            &config.openai.api_key,
        ));
        let pinecone = Arc::new(PineconeClient::new(
            http,
            &config.pinecone.base_url,
            &config.pinecone.api_key,
        ));

        Self::with_clients(config, openai.clone(), pinecone, openai.clone(), openai)
    }

    /// Assemble state from already-constructed clients.
    ///
    /// This is the seam tests use to substitute fakes for the upstream
    /// services.
    pub fn with_clients(
        config: AppConfig,
        embedder: Arc<dyn EmbeddingClient>,
        index: Arc<dyn VectorIndexClient>,
        completion: Arc<dyn CompletionClient>,
        answers: Arc<dyn AnswersClient>,
    ) -> anyhow::Result<Self> {
        let knowledge_base = match &config.ask.knowledge_base_path {
            Some(path) => {
                let kb = KnowledgeBase::load(path)?;
                tracing::info!(path = %path.display(), bytes = kb.text.len(), "knowledge base loaded");
                Some(Arc::new(kb))
            }
            None => None,
        };

        let documents = match &config.answers.documents_path {
            Some(path) => {
                let set = DocumentSet::load(path)?;
                tracing::info!(path = %path.display(), documents = set.len(), "document corpus loaded");
                Some(Arc::new(set))
            }
            None => None,
        };

        let pipeline = RagPipeline::new(embedder, index, completion.clone(), config.rag.clone());

        Ok(Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            completion,
            answers,
            knowledge_base,
            documents,
        })
    }
}
