//! Web search supplement via the Tavily API.

use async_trait::async_trait;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A provider that can fetch fresh snippets from the open web.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Result snippets for the question, best first. May be empty.
    async fn search(&self, question: &str) -> Result<Vec<String>, SearchError>;
}

/// Failure talking to the search provider.
#[derive(Debug, Error, Diagnostic)]
pub enum SearchError {
    /// The request never produced a response.
    #[error("web search request failed: {0}")]
    #[diagnostic(
        code(draftsmith::search::transport),
        help("Is the search API reachable from this host?")
    )]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("web search returned HTTP {status}: {message}")]
    #[diagnostic(
        code(draftsmith::search::api),
        help("A 401 here usually means the API key is missing or wrong.")
    )]
    Api { status: u16, message: String },
}

/// Client for Tavily's `POST /search` endpoint.
#[derive(Clone, Debug)]
pub struct TavilyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    max_results: usize,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    content: String,
}

impl TavilyClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        max_results: usize,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            max_results,
        }
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, question: &str) -> Result<Vec<String>, SearchError> {
        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .json(&SearchRequest {
                api_key: &self.api_key,
                query: question,
                max_results: self.max_results,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.results.into_iter().map(|hit| hit.content).collect())
    }
}
