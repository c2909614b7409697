//! Answer pipeline.
//!
//! One question flows through five stages in a fixed order: embed the
//! question, retrieve the nearest documents, assemble the context block,
//! run the chat completion, and shape the final result. There is no
//! branching, no parallelism, and no retry; the first failing stage aborts
//! the run and its error is surfaced unchanged.

pub mod context;

pub use context::{assemble, RetrievedDocument};

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::clients::{
    ChatMessage, CompletionClient, EmbeddingClient, UpstreamError, VectorIndexClient,
};
use crate::config::RagConfig;

/// Final product of a successful run, serialized directly as the response
/// body. Constructed fresh per request and discarded after.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerResult {
    pub answer: String,
    pub sources: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The question was absent or empty. Checked before any upstream call.
    #[error("Missing question")]
    EmptyQuestion,

    /// A stage's upstream call failed; the message passes through verbatim.
    #[error("{0}")]
    Upstream(#[from] UpstreamError),
}

/// Pipeline stages in execution order. A run that returns `Ok` passed
/// through every stage exactly once; a failure in any stage is terminal for
/// the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Embedding,
    Retrieving,
    Assembling,
    Answering,
    Responding,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Embedding => "embedding",
            Stage::Retrieving => "retrieving",
            Stage::Assembling => "assembling",
            Stage::Answering => "answering",
            Stage::Responding => "responding",
        }
    }
}

/// Orchestrates the embed → retrieve → assemble → answer → respond chain.
///
/// Clients arrive already configured through the constructor, so the
/// pipeline never reads process-wide state and tests can substitute fakes.
/// The pipeline itself holds no per-request state; one instance serves all
/// requests concurrently.
pub struct RagPipeline {
    embedder: Arc<dyn EmbeddingClient>,
    index: Arc<dyn VectorIndexClient>,
    completion: Arc<dyn CompletionClient>,
    config: RagConfig,
}

impl RagPipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingClient>,
        index: Arc<dyn VectorIndexClient>,
        completion: Arc<dyn CompletionClient>,
        config: RagConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            completion,
            config,
        }
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Run the full pipeline for one question.
    pub async fn run(&self, question: &str) -> Result<AnswerResult, PipelineError> {
        if question.is_empty() {
            return Err(PipelineError::EmptyQuestion);
        }

        let vector = self
            .observe(
                Stage::Embedding,
                self.embedder.embed(&self.config.embedding_model, question),
            )
            .await?;

        let documents = self
            .observe(
                Stage::Retrieving,
                self.index.query(&vector, self.config.top_k),
            )
            .await?;

        let context = assemble(&documents);
        tracing::debug!(
            stage = Stage::Assembling.as_str(),
            documents = documents.len(),
            context_bytes = context.len(),
            "context assembled"
        );

        let messages = [
            ChatMessage::system(format!("{}\n\n{}", self.config.system_preamble, context)),
            ChatMessage::user(question),
        ];
        let answer = self
            .observe(
                Stage::Answering,
                self.completion
                    .complete(&self.config.chat_model, &messages, self.config.temperature),
            )
            .await?;

        tracing::debug!(stage = Stage::Responding.as_str(), "run complete");
        metrics::counter!("neurogen_pipeline_runs_total").increment(1);
        Ok(build_result(answer, &documents))
    }

    /// Await one stage's upstream call, recording latency and outcome.
    async fn observe<T>(
        &self,
        stage: Stage,
        call: impl Future<Output = Result<T, UpstreamError>>,
    ) -> Result<T, UpstreamError> {
        let start = Instant::now();
        let result = call.await;
        let elapsed = start.elapsed();

        metrics::histogram!("neurogen_stage_duration_seconds", "stage" => stage.as_str())
            .record(elapsed.as_secs_f64());

        match &result {
            Ok(_) => tracing::debug!(
                stage = stage.as_str(),
                elapsed_ms = elapsed.as_millis() as u64,
                "stage complete"
            ),
            Err(err) => {
                metrics::counter!("neurogen_stage_failures_total", "stage" => stage.as_str())
                    .increment(1);
                tracing::error!(stage = stage.as_str(), error = %err, "stage failed");
            }
        }

        result
    }
}

/// Shape the final response: the generated answer plus the source identifier
/// of every retrieved document in rank order, an empty string standing in
/// for documents without one. Pure; no failure mode.
pub fn build_result(answer: String, documents: &[RetrievedDocument]) -> AnswerResult {
    AnswerResult {
        answer,
        sources: documents
            .iter()
            .map(|doc| doc.source.clone().unwrap_or_default())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct StaticEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingClient for StaticEmbedder {
        async fn embed(&self, _model: &str, _text: &str) -> Result<Vec<f32>, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![0.1, 0.2, 0.3])
        }
    }

    struct StaticIndex {
        documents: Vec<RetrievedDocument>,
    }

    #[async_trait]
    impl VectorIndexClient for StaticIndex {
        async fn query(
            &self,
            _vector: &[f32],
            top_k: usize,
        ) -> Result<Vec<RetrievedDocument>, UpstreamError> {
            Ok(self.documents.iter().take(top_k).cloned().collect())
        }
    }

    struct RecordingCompletion {
        seen: Mutex<Vec<ChatMessage>>,
    }

    #[async_trait]
    impl CompletionClient for RecordingCompletion {
        async fn complete(
            &self,
            _model: &str,
            messages: &[ChatMessage],
            _temperature: Option<f32>,
        ) -> Result<String, UpstreamError> {
            self.seen.lock().unwrap().extend_from_slice(messages);
            Ok("generated answer".to_string())
        }
    }

    fn pipeline_with(documents: Vec<RetrievedDocument>) -> (RagPipeline, Arc<RecordingCompletion>) {
        let completion = Arc::new(RecordingCompletion {
            seen: Mutex::new(Vec::new()),
        });
        let pipeline = RagPipeline::new(
            Arc::new(StaticEmbedder {
                calls: AtomicUsize::new(0),
            }),
            Arc::new(StaticIndex { documents }),
            completion.clone(),
            RagConfig::default(),
        );
        (pipeline, completion)
    }

    #[tokio::test]
    async fn empty_question_fails_before_any_upstream_call() {
        let embedder = Arc::new(StaticEmbedder {
            calls: AtomicUsize::new(0),
        });
        let pipeline = RagPipeline::new(
            embedder.clone(),
            Arc::new(StaticIndex { documents: vec![] }),
            Arc::new(RecordingCompletion {
                seen: Mutex::new(Vec::new()),
            }),
            RagConfig::default(),
        );

        let result = pipeline.run("").await;
        assert!(matches!(result, Err(PipelineError::EmptyQuestion)));
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn sources_follow_retrieval_order() {
        let (pipeline, _) = pipeline_with(vec![
            RetrievedDocument::new("paper1.pdf", "Neuroplasticity is..."),
            RetrievedDocument {
                source: None,
                text: "unattributed".into(),
            },
            RetrievedDocument::new("paper3.pdf", "More text"),
        ]);

        let result = pipeline.run("What is neuroplasticity?").await.unwrap();
        assert_eq!(result.answer, "generated answer");
        assert_eq!(result.sources, vec!["paper1.pdf", "", "paper3.pdf"]);
    }

    #[tokio::test]
    async fn system_turn_carries_preamble_and_context_user_turn_is_verbatim() {
        let (pipeline, completion) =
            pipeline_with(vec![RetrievedDocument::new("paper1.pdf", "Neuroplasticity is...")]);

        pipeline.run("What is neuroplasticity?").await.unwrap();

        let seen = completion.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        let expected_system = format!(
            "{}\n\nSource 1 (paper1.pdf):\nNeuroplasticity is...",
            RagConfig::default().system_preamble
        );
        assert_eq!(seen[0], ChatMessage::system(expected_system));
        assert_eq!(seen[1], ChatMessage::user("What is neuroplasticity?"));
    }

    #[tokio::test]
    async fn zero_matches_still_answers_with_empty_sources() {
        let (pipeline, completion) = pipeline_with(vec![]);

        let result = pipeline.run("anything").await.unwrap();
        assert!(result.sources.is_empty());

        // Empty retrieval means an empty context block after the preamble.
        let seen = completion.seen.lock().unwrap();
        let expected_system = format!("{}\n\n", RagConfig::default().system_preamble);
        assert_eq!(seen[0].content, expected_system);
    }

    #[tokio::test]
    async fn upstream_failure_propagates_verbatim() {
        struct FailingIndex;

        #[async_trait]
        impl VectorIndexClient for FailingIndex {
            async fn query(
                &self,
                _vector: &[f32],
                _top_k: usize,
            ) -> Result<Vec<RetrievedDocument>, UpstreamError> {
                Err(UpstreamError::Status {
                    service: "vector index",
                    status: 503,
                    body: "index unavailable".into(),
                })
            }
        }

        let pipeline = RagPipeline::new(
            Arc::new(StaticEmbedder {
                calls: AtomicUsize::new(0),
            }),
            Arc::new(FailingIndex),
            Arc::new(RecordingCompletion {
                seen: Mutex::new(Vec::new()),
            }),
            RagConfig::default(),
        );

        let err = pipeline.run("question").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "vector index returned HTTP 503: index unavailable"
        );
    }

    #[test]
    fn build_result_substitutes_empty_string_for_missing_source() {
        let docs = vec![
            RetrievedDocument::new("a.pdf", "x"),
            RetrievedDocument {
                source: None,
                text: "y".into(),
            },
        ];
        let result = build_result("answer".into(), &docs);
        assert_eq!(result.sources, vec!["a.pdf".to_string(), String::new()]);
    }

    #[test]
    fn stage_names_cover_every_stage() {
        for (stage, name) in [
            (Stage::Embedding, "embedding"),
            (Stage::Retrieving, "retrieving"),
            (Stage::Assembling, "assembling"),
            (Stage::Answering, "answering"),
            (Stage::Responding, "responding"),
        ] {
            assert_eq!(stage.as_str(), name);
        }
    }
}
