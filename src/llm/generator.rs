use std::sync::Arc;

use super::ollama::Oracle;
use super::prompts;
use crate::node::NodeError;

/// Drafts an email-ready answer from the question and assembled context.
#[derive(Clone)]
pub struct AnswerGenerator {
    oracle: Arc<dyn Oracle>,
}

impl AnswerGenerator {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub async fn generate(&self, question: &str, context: &str) -> Result<String, NodeError> {
        self.oracle
            .complete(&prompts::generate(question, context))
            .await
            .map_err(super::provider_error)
    }
}
