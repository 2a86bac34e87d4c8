#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use draftsmith::app::App;
use draftsmith::config::RunLimits;
use draftsmith::evidence::Passage;
use draftsmith::llm::{Oracle, OracleError};
use draftsmith::retrieval::{EvidenceStore, RetrievalError};
use draftsmith::search::{SearchError, SearchProvider};
use draftsmith::workflow;

/// Oracle that replays a fixed script of replies, in order, regardless of
/// which entry point is called. Prompts are recorded per entry point so
/// tests can assert what the workflow actually asked.
///
/// Replies are popped synchronously before any await point, so concurrent
/// callers (the relevance grading fan-out) consume the script in the order
/// their futures were created.
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<String>>,
    text_prompts: Mutex<Vec<String>>,
    structured_prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub fn new<I, S>(replies: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            text_prompts: Mutex::new(Vec::new()),
            structured_prompts: Mutex::new(Vec::new()),
        })
    }

    fn next_reply(&self) -> Result<String, OracleError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| OracleError::Api {
                status: 500,
                message: "oracle script exhausted".into(),
            })
    }

    /// Prompts sent through free-text completion (drafting).
    pub fn text_prompts(&self) -> Vec<String> {
        self.text_prompts.lock().unwrap().clone()
    }

    /// Prompts sent through JSON-mode completion (verdicts).
    pub fn structured_prompts(&self) -> Vec<String> {
        self.structured_prompts.lock().unwrap().clone()
    }

    pub fn remaining_replies(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        self.text_prompts.lock().unwrap().push(prompt.to_string());
        self.next_reply()
    }

    async fn complete_structured(&self, prompt: &str) -> Result<String, OracleError> {
        self.structured_prompts
            .lock()
            .unwrap()
            .push(prompt.to_string());
        self.next_reply()
    }
}

/// Evidence store that returns a fixed passage set and records queries.
pub struct FakeEvidenceStore {
    passages: Vec<Passage>,
    queries: Mutex<Vec<String>>,
}

impl FakeEvidenceStore {
    pub fn with_passages(contents: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            passages: contents
                .iter()
                .map(|content| Passage::corpus(*content, None))
                .collect(),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::with_passages(&[])
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl EvidenceStore for FakeEvidenceStore {
    async fn retrieve(&self, question: &str) -> Result<Vec<Passage>, RetrievalError> {
        self.queries.lock().unwrap().push(question.to_string());
        Ok(self.passages.clone())
    }
}

/// Search provider that returns fixed snippets and records queries.
pub struct FakeSearch {
    snippets: Vec<String>,
    queries: Mutex<Vec<String>>,
}

impl FakeSearch {
    pub fn with_snippets(snippets: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            snippets: snippets.iter().map(ToString::to_string).collect(),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::with_snippets(&[])
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(&self, question: &str) -> Result<Vec<String>, SearchError> {
        self.queries.lock().unwrap().push(question.to_string());
        Ok(self.snippets.clone())
    }
}

/// Assembles the standard workflow over the fakes.
pub fn scripted_app(
    oracle: &Arc<ScriptedOracle>,
    store: &Arc<FakeEvidenceStore>,
    search: &Arc<FakeSearch>,
    limits: RunLimits,
) -> App {
    workflow::build(
        oracle.clone() as Arc<dyn Oracle>,
        store.clone() as Arc<dyn EvidenceStore>,
        search.clone() as Arc<dyn SearchProvider>,
        limits,
    )
    .expect("standard wiring compiles")
}

/// A `{"datasource": ...}` routing reply.
pub fn datasource(label: &str) -> String {
    format!(r#"{{"datasource": "{label}"}}"#)
}

/// A `{"score": ...}` grading reply.
pub fn score(label: &str) -> String {
    format!(r#"{{"score": "{label}"}}"#)
}
