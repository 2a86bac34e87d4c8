//! Standard workflow assembly.
//!
//! Wires the answering pipeline the binary runs:
//!
//! ```text
//! start --(route)--> retrieve -> grade_docs --(supplement?)--> web_search
//!   \                                   \                        |
//!    `--(route)--> web_search            `--> generate <---------'
//!                                              |
//!                                  (verify: regenerate / search / end)
//! ```
//!
//! [`build`] takes the collaborators as trait objects so tests can run the
//! full graph against scripted fakes; [`from_settings`] constructs the
//! production HTTP clients.

use std::sync::Arc;

use crate::app::App;
use crate::config::{RunLimits, Settings};
use crate::decisions::{RouteDecision, SupplementDecision, VerifyDecision};
use crate::graph::{GraphBuilder, GraphError};
use crate::llm::{
    AnswerGenerator, GroundingGrader, OllamaClient, Oracle, QuestionRouter, RelevanceGrader,
    ResolutionGrader,
};
use crate::nodes::{GenerateNode, GradeDocsNode, RetrieveNode, WebSearchNode};
use crate::retrieval::{EvidenceStore, HttpEvidenceStore};
use crate::search::{SearchProvider, TavilyClient};
use crate::types::NodeKind;

/// Builds the standard answering workflow over the given collaborators.
///
/// # Errors
///
/// Propagates [`GraphError`] from compilation; with this fixed wiring that
/// only happens if the wiring here is itself broken, so a failure is a bug.
pub fn build(
    oracle: Arc<dyn Oracle>,
    store: Arc<dyn EvidenceStore>,
    search: Arc<dyn SearchProvider>,
    limits: RunLimits,
) -> Result<App, GraphError> {
    GraphBuilder::new()
        .add_node(NodeKind::Retrieve, RetrieveNode::new(store))
        .add_node(
            NodeKind::GradeDocs,
            GradeDocsNode::new(RelevanceGrader::new(oracle.clone())),
        )
        .add_node(NodeKind::WebSearch, WebSearchNode::new(search))
        .add_node(
            NodeKind::Generate,
            GenerateNode::new(AnswerGenerator::new(oracle.clone())),
        )
        .add_decision(
            NodeKind::Start,
            RouteDecision::new(QuestionRouter::new(oracle.clone())),
        )
        .add_edge(NodeKind::Retrieve, NodeKind::GradeDocs)
        .add_decision(NodeKind::GradeDocs, SupplementDecision)
        .add_edge(NodeKind::WebSearch, NodeKind::Generate)
        .add_decision(
            NodeKind::Generate,
            VerifyDecision::new(
                GroundingGrader::new(oracle.clone()),
                ResolutionGrader::new(oracle),
            ),
        )
        .with_limits(limits)
        .compile()
}

/// Builds the workflow against the production HTTP collaborators.
pub fn from_settings(settings: &Settings, http: reqwest::Client) -> Result<App, GraphError> {
    let oracle: Arc<dyn Oracle> = Arc::new(OllamaClient::new(
        http.clone(),
        &settings.oracle.base_url,
        &settings.oracle.model,
    ));
    let store: Arc<dyn EvidenceStore> = Arc::new(HttpEvidenceStore::new(
        http.clone(),
        &settings.retriever.base_url,
        settings.retriever.top_k,
    ));
    let search: Arc<dyn SearchProvider> = Arc::new(TavilyClient::new(
        http,
        &settings.search.base_url,
        &settings.search.api_key,
        settings.search.max_results,
    ));
    build(oracle, store, search, settings.limits)
}
