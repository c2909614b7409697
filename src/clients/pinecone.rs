//! Vector index client.
//!
//! Speaks the Pinecone-style query protocol: `POST {index host}/query` with
//! an `Api-Key` header, asking for metadata alongside each match so the
//! caller can recover source identifier and text.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{UpstreamError, UpstreamResult, VectorIndexClient};
use crate::pipeline::RetrievedDocument;

const SERVICE: &str = "vector index";

#[derive(Clone)]
pub struct PineconeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PineconeClient {
    /// `base_url` is the index host, e.g.
    /// `https://my-index-abc123.svc.us-east1-gcp.pinecone.io`.
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    #[serde(default)]
    metadata: Option<MatchMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct MatchMetadata {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

/// Match order is the index's rank order and must be preserved. A match
/// without metadata becomes a document with no source and empty text.
fn documents_from_matches(matches: Vec<QueryMatch>) -> Vec<RetrievedDocument> {
    matches
        .into_iter()
        .map(|m| {
            let metadata = m.metadata.unwrap_or_default();
            RetrievedDocument {
                source: metadata.source,
                text: metadata.text.unwrap_or_default(),
            }
        })
        .collect()
}

#[async_trait]
impl VectorIndexClient for PineconeClient {
    async fn query(&self, vector: &[f32], top_k: usize) -> UpstreamResult<Vec<RetrievedDocument>> {
        let url = format!("{}/query", self.base_url);
        let payload = json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
        });

        let response = self
            .http
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| UpstreamError::Transport {
                service: SERVICE,
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: QueryResponse =
            response
                .json()
                .await
                .map_err(|err| UpstreamError::Malformed {
                    service: SERVICE,
                    detail: format!("invalid JSON body: {err}"),
                })?;

        Ok(documents_from_matches(parsed.matches))
    }
}
