//! Startup corpus.
//!
//! Two optional read-only assets loaded once when the server starts and
//! shared across requests behind `Arc`: a flat knowledge-base text file for
//! the ask route, and a JSON document list for the hosted answers route.
//! No handler mutates either, so no locking is involved.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("failed to read corpus file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse corpus file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Flat knowledge-base text pasted verbatim into the ask prompt.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    pub text: String,
}

impl KnowledgeBase {
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let text = fs::read_to_string(path).map_err(|source| CorpusError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { text })
    }
}

/// One entry in the answers-route document list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusDocument {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
}

/// Document list forwarded with every hosted answers request.
#[derive(Debug, Clone)]
pub struct DocumentSet {
    pub documents: Vec<CorpusDocument>,
}

impl DocumentSet {
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let raw = fs::read_to_string(path).map_err(|source| CorpusError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let documents = serde_json::from_str(&raw).map_err(|source| CorpusError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { documents })
    }

    /// Just the text of every document, in file order.
    pub fn texts(&self) -> Vec<String> {
        self.documents.iter().map(|doc| doc.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
