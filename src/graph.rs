//! Graph construction for the answering workflow.
//!
//! This module contains the fluent [`GraphBuilder`] plus the [`Decision`]
//! seam for branch points. A node routes onward in exactly one of two ways:
//! a single unconditional edge, or a decision evaluated against the state
//! after the node ran. The engine executes strictly sequentially, so
//! fan-out is a wiring mistake here and [`compile`](GraphBuilder::compile)
//! rejects it instead of deferring the surprise to runtime.
//!
//! Decisions are async because this workflow's branch points (routing,
//! verification) consult the oracle, not just the snapshot.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

use crate::app::App;
use crate::config::RunLimits;
use crate::node::{Node, NodeContext, NodeError};
use crate::state::StateSnapshot;
use crate::types::NodeKind;

/// A branch point: picks the next station from the current state.
///
/// Evaluated after its source node completes (or, for the entry decision,
/// before any node has run). Returning [`NodeKind::End`] terminates the run
/// successfully.
#[async_trait]
pub trait Decision: Send + Sync {
    async fn decide(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodeKind, NodeError>;
}

/// Structural problems caught when compiling a graph.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    /// No edge or decision leaves the virtual start node.
    #[error("graph has no route out of the virtual start node")]
    #[diagnostic(
        code(draftsmith::graph::no_entry),
        help("Add an edge or a decision from NodeKind::Start.")
    )]
    NoEntry,

    /// A registered node has neither an edge nor a decision out.
    #[error("node `{from}` has no outgoing route")]
    #[diagnostic(
        code(draftsmith::graph::dead_end),
        help("Every registered node needs exactly one edge or one decision out.")
    )]
    DeadEnd { from: NodeKind },

    /// A node has more than one route out (two edges, or an edge plus a
    /// decision). The engine is sequential; one successor per node.
    #[error("conflicting routes out of `{from}`")]
    #[diagnostic(code(draftsmith::graph::conflicting_routes))]
    ConflictingRoutes { from: NodeKind },

    /// An edge points at (or leaves from) a node that was never registered.
    #[error("route references unregistered node `{kind}`")]
    #[diagnostic(code(draftsmith::graph::missing_node))]
    MissingNode { kind: NodeKind },

    /// The virtual end node cannot have outgoing routes.
    #[error("the virtual end node cannot have outgoing routes")]
    #[diagnostic(code(draftsmith::graph::route_from_end))]
    RouteFromEnd,
}

/// Builder for constructing workflow graphs with a fluent API.
///
/// # Examples
///
/// ```
/// use draftsmith::graph::GraphBuilder;
/// use draftsmith::types::NodeKind;
///
/// # struct DraftNode;
/// # #[async_trait::async_trait]
/// # impl draftsmith::node::Node for DraftNode {
/// #     async fn run(
/// #         &self,
/// #         _: draftsmith::state::StateSnapshot,
/// #         _: draftsmith::node::NodeContext,
/// #     ) -> Result<draftsmith::node::NodePartial, draftsmith::node::NodeError> {
/// #         Ok(draftsmith::node::NodePartial::default())
/// #     }
/// # }
/// let app = GraphBuilder::new()
///     .add_node(NodeKind::Generate, DraftNode)
///     .add_edge(NodeKind::Start, NodeKind::Generate)
///     .add_edge(NodeKind::Generate, NodeKind::End)
///     .compile()?;
/// # Ok::<(), draftsmith::graph::GraphError>(())
/// ```
pub struct GraphBuilder {
    /// Registry of executable nodes, keyed by their identifier.
    pub nodes: FxHashMap<NodeKind, Arc<dyn Node>>,
    /// Unconditional edges. Kept as a list per source until compile so that
    /// accidental fan-out is reported instead of silently overwritten.
    pub edges: FxHashMap<NodeKind, Vec<NodeKind>>,
    /// Decisions attached to source nodes.
    pub decisions: FxHashMap<NodeKind, Arc<dyn Decision>>,
    /// Loop caps for the compiled application.
    pub limits: RunLimits,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Creates a new, empty graph builder with default loop caps.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: FxHashMap::default(),
            edges: FxHashMap::default(),
            decisions: FxHashMap::default(),
            limits: RunLimits::default(),
        }
    }

    /// Adds a node to the graph.
    ///
    /// `NodeKind::Start` and `NodeKind::End` are virtual structural
    /// endpoints. If either is passed here the registration is ignored and
    /// a warning is emitted; they are never executed.
    #[must_use]
    pub fn add_node(mut self, id: NodeKind, node: impl Node + 'static) -> Self {
        match id {
            NodeKind::Start | NodeKind::End => {
                tracing::warn!(
                    ?id,
                    "Ignoring registration of virtual node kind (Start/End are virtual)"
                );
            }
            _ => {
                self.nodes.insert(id, Arc::new(node));
            }
        }
        self
    }

    /// Adds an unconditional edge between two stations.
    #[must_use]
    pub fn add_edge(mut self, from: NodeKind, to: NodeKind) -> Self {
        self.edges.entry(from).or_default().push(to);
        self
    }

    /// Attaches a decision to a source station.
    #[must_use]
    pub fn add_decision(mut self, from: NodeKind, decision: impl Decision + 'static) -> Self {
        self.decisions.insert(from, Arc::new(decision));
        self
    }

    /// Overrides the loop caps for the compiled application.
    #[must_use]
    pub fn with_limits(mut self, limits: RunLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Compiles the graph into an executable application.
    ///
    /// Validates the wiring first: an entry route must exist, every
    /// registered node needs exactly one route out, no route may leave the
    /// virtual end, and unconditional edges may only reference registered
    /// nodes (or the virtual endpoints).
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] describing the first structural problem
    /// found.
    pub fn compile(self) -> Result<App, GraphError> {
        if self.edges.contains_key(&NodeKind::End) || self.decisions.contains_key(&NodeKind::End) {
            return Err(GraphError::RouteFromEnd);
        }
        if !self.edges.contains_key(&NodeKind::Start)
            && !self.decisions.contains_key(&NodeKind::Start)
        {
            return Err(GraphError::NoEntry);
        }

        let mut edges = FxHashMap::default();
        for (from, targets) in &self.edges {
            if !from.is_start() && !self.nodes.contains_key(from) {
                return Err(GraphError::MissingNode { kind: *from });
            }
            if self.decisions.contains_key(from) || targets.len() > 1 {
                return Err(GraphError::ConflictingRoutes { from: *from });
            }
            let to = targets[0];
            if !to.is_end() && !self.nodes.contains_key(&to) {
                return Err(GraphError::MissingNode { kind: to });
            }
            edges.insert(*from, to);
        }

        for kind in self.nodes.keys() {
            if !edges.contains_key(kind) && !self.decisions.contains_key(kind) {
                return Err(GraphError::DeadEnd { from: *kind });
            }
        }

        Ok(App::from_parts(
            self.nodes,
            edges,
            self.decisions,
            self.limits,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodePartial;

    struct NoopNode;

    #[async_trait]
    impl Node for NoopNode {
        async fn run(
            &self,
            _snapshot: StateSnapshot,
            _ctx: NodeContext,
        ) -> Result<NodePartial, NodeError> {
            Ok(NodePartial::default())
        }
    }

    #[test]
    fn virtual_endpoints_are_not_registered() {
        let builder = GraphBuilder::new()
            .add_node(NodeKind::Start, NoopNode)
            .add_node(NodeKind::End, NoopNode)
            .add_node(NodeKind::Generate, NoopNode);
        assert_eq!(builder.nodes.len(), 1);
        assert!(builder.nodes.contains_key(&NodeKind::Generate));
    }

    #[test]
    fn accidental_fan_out_is_rejected() {
        let err = GraphBuilder::new()
            .add_node(NodeKind::Generate, NoopNode)
            .add_edge(NodeKind::Start, NodeKind::Generate)
            .add_edge(NodeKind::Generate, NodeKind::End)
            .add_edge(NodeKind::Generate, NodeKind::WebSearch)
            .compile()
            .unwrap_err();
        assert!(matches!(
            err,
            GraphError::ConflictingRoutes {
                from: NodeKind::Generate
            }
        ));
    }
}
