//! Graph wiring validation through the public builder API.

use async_trait::async_trait;

use draftsmith::config::RunLimits;
use draftsmith::graph::{Decision, GraphBuilder, GraphError};
use draftsmith::node::{Node, NodeContext, NodeError, NodePartial};
use draftsmith::state::StateSnapshot;
use draftsmith::types::NodeKind;

mod common;
use common::*;

struct StubNode;

#[async_trait]
impl Node for StubNode {
    async fn run(
        &self,
        _snapshot: StateSnapshot,
        _ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        Ok(NodePartial::default())
    }
}

struct Always(NodeKind);

#[async_trait]
impl Decision for Always {
    async fn decide(
        &self,
        _snapshot: StateSnapshot,
        _ctx: NodeContext,
    ) -> Result<NodeKind, NodeError> {
        Ok(self.0)
    }
}

#[test]
fn standard_workflow_compiles() {
    let oracle = ScriptedOracle::new(Vec::<String>::new());
    let store = FakeEvidenceStore::empty();
    let search = FakeSearch::empty();
    let limits = RunLimits {
        max_generations: 5,
        ..RunLimits::default()
    };

    let app = scripted_app(&oracle, &store, &search, limits);

    assert_eq!(app.nodes().len(), 4);
    assert_eq!(app.edges().len(), 2);
    assert_eq!(
        app.edges().get(&NodeKind::Retrieve),
        Some(&NodeKind::GradeDocs)
    );
    assert_eq!(
        app.edges().get(&NodeKind::WebSearch),
        Some(&NodeKind::Generate)
    );
    assert_eq!(app.limits().max_generations, 5);
}

#[test]
fn decision_only_wiring_compiles() {
    let app = GraphBuilder::new()
        .add_node(NodeKind::Generate, StubNode)
        .add_decision(NodeKind::Start, Always(NodeKind::Generate))
        .add_decision(NodeKind::Generate, Always(NodeKind::End))
        .compile()
        .unwrap();

    assert!(app.edges().is_empty());
    assert_eq!(app.nodes().len(), 1);
}

#[test]
fn missing_entry_is_rejected() {
    let err = GraphBuilder::new()
        .add_node(NodeKind::Generate, StubNode)
        .add_edge(NodeKind::Generate, NodeKind::End)
        .compile()
        .unwrap_err();

    assert!(matches!(err, GraphError::NoEntry));
}

#[test]
fn dead_end_station_is_rejected() {
    let err = GraphBuilder::new()
        .add_node(NodeKind::Generate, StubNode)
        .add_edge(NodeKind::Start, NodeKind::Generate)
        .compile()
        .unwrap_err();

    assert!(matches!(
        err,
        GraphError::DeadEnd {
            from: NodeKind::Generate
        }
    ));
}

#[test]
fn route_to_unregistered_station_is_rejected() {
    let err = GraphBuilder::new()
        .add_node(NodeKind::Generate, StubNode)
        .add_edge(NodeKind::Start, NodeKind::Generate)
        .add_edge(NodeKind::Generate, NodeKind::WebSearch)
        .compile()
        .unwrap_err();

    assert!(matches!(
        err,
        GraphError::MissingNode {
            kind: NodeKind::WebSearch
        }
    ));
}

#[test]
fn route_from_the_terminal_is_rejected() {
    let err = GraphBuilder::new()
        .add_node(NodeKind::Generate, StubNode)
        .add_edge(NodeKind::Start, NodeKind::Generate)
        .add_edge(NodeKind::Generate, NodeKind::End)
        .add_edge(NodeKind::End, NodeKind::Generate)
        .compile()
        .unwrap_err();

    assert!(matches!(err, GraphError::RouteFromEnd));
}

#[test]
fn edge_plus_decision_is_a_conflict() {
    let err = GraphBuilder::new()
        .add_node(NodeKind::Generate, StubNode)
        .add_edge(NodeKind::Start, NodeKind::Generate)
        .add_edge(NodeKind::Generate, NodeKind::End)
        .add_decision(NodeKind::Generate, Always(NodeKind::End))
        .compile()
        .unwrap_err();

    assert!(matches!(
        err,
        GraphError::ConflictingRoutes {
            from: NodeKind::Generate
        }
    ));
}
