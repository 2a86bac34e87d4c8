//! The three verdict-producing graders.
//!
//! Each wraps the oracle's JSON mode with one prompt and one strict parser.
//! Relevance is judged per passage; grounding and resolution judge a whole
//! drafted answer.

use std::sync::Arc;

use super::ollama::Oracle;
use super::prompts;
use crate::node::NodeError;
use crate::verdict::{GroundingVerdict, RelevanceVerdict, ResolutionVerdict};

/// Judges whether a retrieved passage bears on the question.
#[derive(Clone)]
pub struct RelevanceGrader {
    oracle: Arc<dyn Oracle>,
}

impl RelevanceGrader {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub async fn grade(
        &self,
        question: &str,
        passage: &str,
    ) -> Result<RelevanceVerdict, NodeError> {
        let raw = self
            .oracle
            .complete_structured(&prompts::relevance(question, passage))
            .await
            .map_err(super::provider_error)?;
        Ok(RelevanceVerdict::parse(&raw)?)
    }
}

/// Judges whether a drafted answer is supported by the evidence it saw.
#[derive(Clone)]
pub struct GroundingGrader {
    oracle: Arc<dyn Oracle>,
}

impl GroundingGrader {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub async fn check(
        &self,
        evidence: &str,
        generation: &str,
    ) -> Result<GroundingVerdict, NodeError> {
        let raw = self
            .oracle
            .complete_structured(&prompts::grounding(evidence, generation))
            .await
            .map_err(super::provider_error)?;
        Ok(GroundingVerdict::parse(&raw)?)
    }
}

/// Judges whether a drafted answer actually resolves the question.
#[derive(Clone)]
pub struct ResolutionGrader {
    oracle: Arc<dyn Oracle>,
}

impl ResolutionGrader {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub async fn check(
        &self,
        question: &str,
        generation: &str,
    ) -> Result<ResolutionVerdict, NodeError> {
        let raw = self
            .oracle
            .complete_structured(&prompts::resolution(question, generation))
            .await
            .map_err(super::provider_error)?;
        Ok(ResolutionVerdict::parse(&raw)?)
    }
}
