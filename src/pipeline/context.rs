//! Context assembly.
//!
//! Pure formatting of retrieved documents into the text block fed to the
//! model. No I/O; byte-deterministic for a given ordered input.

use serde::{Deserialize, Serialize};

/// One document returned by the vector index, in rank order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    /// Source identifier from the index metadata. Absent when the stored
    /// record carried none; display falls back to a positional `doc{n}`
    /// label and the response's source list carries an empty string.
    #[serde(default)]
    pub source: Option<String>,

    /// Document text, empty when the stored record carried none.
    #[serde(default)]
    pub text: String,
}

impl RetrievedDocument {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            text: text.into(),
        }
    }
}

/// Format retrieved documents into the labeled context block.
///
/// One paragraph per document:
///
/// ```text
/// Source {rank} ({source}):
/// {text}
/// ```
///
/// with a blank line between paragraphs. Rank is 1-based and follows the
/// input order. An empty document list produces an empty string.
pub fn assemble(documents: &[RetrievedDocument]) -> String {
    documents
        .iter()
        .enumerate()
        .map(|(i, doc)| {
            let label = match doc.source.as_deref() {
                Some(source) => source.to_string(),
                None => format!("doc{}", i + 1),
            };
            format!("Source {} ({label}):\n{}", i + 1, doc.text)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
