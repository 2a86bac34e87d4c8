//! Evidence store access.
//!
//! The curated corpus lives behind a vector-index service; this module owns
//! the seam ([`EvidenceStore`]) and the HTTP client that talks to it.
//! Ingestion, chunking, and embeddings are the store's problem, not ours.

use async_trait::async_trait;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::evidence::Passage;

/// Similarity retrieval over the curated corpus.
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Top passages for the question, most similar first. An empty result
    /// is a valid answer, not an error.
    async fn retrieve(&self, question: &str) -> Result<Vec<Passage>, RetrievalError>;
}

/// Failure talking to the evidence store.
#[derive(Debug, Error, Diagnostic)]
pub enum RetrievalError {
    /// The request never produced a response.
    #[error("evidence store request failed: {0}")]
    #[diagnostic(
        code(draftsmith::retrieval::transport),
        help("Is the evidence store reachable at the configured base URL?")
    )]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("evidence store returned HTTP {status}: {message}")]
    #[diagnostic(code(draftsmith::retrieval::api))]
    Api { status: u16, message: String },
}

/// HTTP client for a vector-index service exposing `POST /query`.
#[derive(Clone, Debug)]
pub struct HttpEvidenceStore {
    http: reqwest::Client,
    base_url: String,
    top_k: usize,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    top_k: usize,
}

#[derive(Deserialize)]
struct QueryResponse {
    results: Vec<QueryHit>,
}

#[derive(Deserialize)]
struct QueryHit {
    content: String,
    #[serde(default)]
    source: Option<String>,
}

impl HttpEvidenceStore {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, top_k: usize) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            top_k,
        }
    }
}

#[async_trait]
impl EvidenceStore for HttpEvidenceStore {
    async fn retrieve(&self, question: &str) -> Result<Vec<Passage>, RetrievalError> {
        let response = self
            .http
            .post(format!("{}/query", self.base_url))
            .json(&QueryRequest {
                query: question,
                top_k: self.top_k,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: QueryResponse = response.json().await?;
        Ok(body
            .results
            .into_iter()
            .map(|hit| Passage::corpus(hit.content, hit.source))
            .collect())
    }
}
