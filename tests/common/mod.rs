//! Shared fakes for integration tests.
//!
//! Each fake implements one upstream client trait, records its calls into a
//! shared journal, and either returns a canned value or fails with a canned
//! transport error.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use neurogen::clients::{
    AnswersClient, AnswersQuery, ChatMessage, CompletionClient, EmbeddingClient, UpstreamError,
    UpstreamResult, VectorIndexClient,
};
use neurogen::pipeline::RetrievedDocument;

/// Ordered journal of every upstream call made during a test.
#[derive(Default)]
pub struct CallJournal {
    entries: Mutex<Vec<String>>,
}

impl CallJournal {
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

pub struct FakeEmbedder {
    pub journal: Arc<CallJournal>,
    pub vector: Vec<f32>,
    pub fail_message: Option<String>,
}

impl FakeEmbedder {
    pub fn new(journal: Arc<CallJournal>) -> Self {
        Self {
            journal,
            vector: vec![0.1, 0.2, 0.3],
            fail_message: None,
        }
    }

    pub fn failing(journal: Arc<CallJournal>, message: &str) -> Self {
        Self {
            fail_message: Some(message.to_string()),
            ..Self::new(journal)
        }
    }
}

#[async_trait]
impl EmbeddingClient for FakeEmbedder {
    async fn embed(&self, _model: &str, text: &str) -> UpstreamResult<Vec<f32>> {
        self.journal.record(format!("embed:{text}"));
        match &self.fail_message {
            Some(message) => Err(UpstreamError::Transport {
                service: "embeddings",
                message: message.clone(),
            }),
            None => Ok(self.vector.clone()),
        }
    }
}

pub struct FakeIndex {
    pub journal: Arc<CallJournal>,
    pub documents: Vec<RetrievedDocument>,
    pub fail_message: Option<String>,
}

impl FakeIndex {
    pub fn new(journal: Arc<CallJournal>, documents: Vec<RetrievedDocument>) -> Self {
        Self {
            journal,
            documents,
            fail_message: None,
        }
    }

    pub fn failing(journal: Arc<CallJournal>, message: &str) -> Self {
        Self {
            fail_message: Some(message.to_string()),
            ..Self::new(journal, Vec::new())
        }
    }
}

#[async_trait]
impl VectorIndexClient for FakeIndex {
    async fn query(&self, _vector: &[f32], top_k: usize) -> UpstreamResult<Vec<RetrievedDocument>> {
        self.journal.record(format!("query:top_k={top_k}"));
        match &self.fail_message {
            Some(message) => Err(UpstreamError::Transport {
                service: "vector index",
                message: message.clone(),
            }),
            None => Ok(self.documents.iter().take(top_k).cloned().collect()),
        }
    }
}

pub struct FakeCompletion {
    pub journal: Arc<CallJournal>,
    pub answer: String,
    pub fail_message: Option<String>,
    pub seen: Mutex<Vec<(String, Vec<ChatMessage>)>>,
    pub temperatures: Mutex<Vec<Option<f32>>>,
}

impl FakeCompletion {
    pub fn new(journal: Arc<CallJournal>, answer: &str) -> Self {
        Self {
            journal,
            answer: answer.to_string(),
            fail_message: None,
            seen: Mutex::new(Vec::new()),
            temperatures: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(journal: Arc<CallJournal>, message: &str) -> Self {
        Self {
            fail_message: Some(message.to_string()),
            ..Self::new(journal, "")
        }
    }

    /// Every (model, messages) pair this fake has been asked to complete.
    pub fn calls(&self) -> Vec<(String, Vec<ChatMessage>)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletion {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: Option<f32>,
    ) -> UpstreamResult<String> {
        self.journal.record("complete");
        self.seen
            .lock()
            .unwrap()
            .push((model.to_string(), messages.to_vec()));
        self.temperatures.lock().unwrap().push(temperature);
        match &self.fail_message {
            Some(message) => Err(UpstreamError::Transport {
                service: "chat completions",
                message: message.clone(),
            }),
            None => Ok(self.answer.clone()),
        }
    }
}

pub struct FakeAnswers {
    pub journal: Arc<CallJournal>,
    pub answers: Vec<String>,
    pub fail_message: Option<String>,
    pub seen: Mutex<Vec<AnswersQuery>>,
}

impl FakeAnswers {
    pub fn new(journal: Arc<CallJournal>, answers: Vec<String>) -> Self {
        Self {
            journal,
            answers,
            fail_message: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<AnswersQuery> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswersClient for FakeAnswers {
    async fn answers(&self, query: AnswersQuery) -> UpstreamResult<Vec<String>> {
        self.journal.record("answers");
        self.seen.lock().unwrap().push(query);
        match &self.fail_message {
            Some(message) => Err(UpstreamError::Transport {
                service: "answers",
                message: message.clone(),
            }),
            None => Ok(self.answers.clone()),
        }
    }
}
