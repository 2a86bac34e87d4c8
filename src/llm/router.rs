use std::sync::Arc;

use super::ollama::Oracle;
use super::prompts;
use crate::node::NodeError;
use crate::verdict::RouteVerdict;

/// Decides whether a question belongs to the curated corpus or the open web.
#[derive(Clone)]
pub struct QuestionRouter {
    oracle: Arc<dyn Oracle>,
}

impl QuestionRouter {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub async fn route(&self, question: &str) -> Result<RouteVerdict, NodeError> {
        let raw = self
            .oracle
            .complete_structured(&prompts::route(question))
            .await
            .map_err(super::provider_error)?;
        Ok(RouteVerdict::parse(&raw)?)
    }
}
