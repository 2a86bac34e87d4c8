//! Oracle abstraction and the Ollama-backed implementation.
//!
//! Every judgment call in the workflow (routing, grading, drafting) goes
//! through the [`Oracle`] trait. Verdict prompts use
//! [`complete_structured`](Oracle::complete_structured), which asks the
//! model for JSON output; drafting uses free-text
//! [`complete`](Oracle::complete). Keeping the two entry points separate
//! also makes test doubles precise about which kind of call they saw.

use async_trait::async_trait;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A language model that can draft text and emit structured verdicts.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Free-text completion, used for drafting answers.
    async fn complete(&self, prompt: &str) -> Result<String, OracleError>;

    /// JSON-mode completion, used for verdict prompts. The returned string
    /// is the raw model reply; callers parse it with the verdict parsers.
    async fn complete_structured(&self, prompt: &str) -> Result<String, OracleError>;
}

/// Failure talking to the oracle.
#[derive(Debug, Error, Diagnostic)]
pub enum OracleError {
    /// The request never produced a response.
    #[error("oracle request failed: {0}")]
    #[diagnostic(
        code(draftsmith::oracle::transport),
        help("Is the Ollama server reachable at the configured base URL?")
    )]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("oracle returned HTTP {status}: {message}")]
    #[diagnostic(code(draftsmith::oracle::api))]
    Api { status: u16, message: String },
}

/// Client for a local Ollama server's `/api/generate` endpoint.
///
/// Requests are non-streaming and pinned to temperature zero: the workflow
/// retries by changing its inputs, not by sampling differently.
#[derive(Clone, Debug)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    async fn generate(&self, prompt: &str, json_mode: bool) -> Result<String, OracleError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: json_mode.then_some("json"),
            options: GenerateOptions { temperature: 0.0 },
        };
        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OracleError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.response)
    }
}

#[async_trait]
impl Oracle for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        self.generate(prompt, false).await
    }

    async fn complete_structured(&self, prompt: &str) -> Result<String, OracleError> {
        self.generate(prompt, true).await
    }
}
