//! Node execution framework for the answering workflow.
//!
//! This module provides the core abstractions for executable workflow nodes:
//! the [`Node`] trait, the execution context, partial state updates, and the
//! fatal error taxonomy.

// Standard library and external crates
use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

// Internal crate modules
use crate::event_bus::Event;
use crate::evidence::EvidenceUpdate;
use crate::state::StateSnapshot;
use crate::verdict::VerdictError;

// ============================================================================
// Core Trait
// ============================================================================

/// Core trait defining executable workflow nodes.
///
/// A node receives a detached snapshot of the run state plus an execution
/// context, does its work (usually one or more collaborator calls), and
/// returns the partial update it wants merged. Nodes hold their collaborator
/// clients but no run state; everything run-scoped arrives in the snapshot.
///
/// Every error a node returns is fatal to the run. This workflow has no
/// recoverable-error channel: a collaborator that cannot be reached or a
/// verdict that cannot be parsed ends the run rather than steering it down
/// a guessed branch.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use draftsmith::node::{Node, NodeContext, NodeError, NodePartial};
/// use draftsmith::state::StateSnapshot;
///
/// struct EchoNode;
///
/// #[async_trait]
/// impl Node for EchoNode {
///     async fn run(
///         &self,
///         snapshot: StateSnapshot,
///         ctx: NodeContext,
///     ) -> Result<NodePartial, NodeError> {
///         ctx.emit("echo", "answering with the question verbatim")?;
///         Ok(NodePartial::new().with_generation(snapshot.question))
///     }
/// }
/// ```
#[async_trait]
pub trait Node: Send + Sync {
    /// Execute this node with the given state snapshot and context.
    async fn run(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError>;
}

// ============================================================================
// Execution Context
// ============================================================================

/// Execution context passed to nodes (and decisions) during a run.
#[derive(Clone, Debug)]
pub struct NodeContext {
    /// Identifier of the executing node, as logged and evented.
    pub node_id: String,
    /// Current execution step number.
    pub step: u64,
    /// Channel for emitting events to the workflow's event system.
    pub event_bus_sender: flume::Sender<Event>,
}

impl NodeContext {
    /// Emit a node-scoped event enriched with this context's metadata.
    pub fn emit(
        &self,
        scope: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<(), NodeContextError> {
        self.event_bus_sender
            .send(Event::node_message_with_meta(
                self.node_id.clone(),
                self.step,
                scope,
                message,
            ))
            .map_err(|_| NodeContextError::EventBusUnavailable)
    }
}

// ============================================================================
// State Updates
// ============================================================================

/// Partial state update returned by node execution.
///
/// All fields are optional; a node touches only the channels it cares about
/// and the engine merges the rest untouched. The question has no field here
/// on purpose: no node may rewrite it.
#[derive(Clone, Debug, Default)]
pub struct NodePartial {
    /// Change to the evidence passages (replace or append).
    pub evidence: Option<EvidenceUpdate>,
    /// Newly drafted answer.
    pub generation: Option<String>,
    /// New value for the needs-supplement flag.
    pub needs_supplement: Option<bool>,
}

impl NodePartial {
    pub fn new() -> Self {
        Self {
            ..Default::default()
        }
    }

    /// Attach an evidence update.
    #[must_use]
    pub fn with_evidence(mut self, update: EvidenceUpdate) -> Self {
        self.evidence = Some(update);
        self
    }

    /// Attach a drafted answer.
    #[must_use]
    pub fn with_generation(mut self, generation: impl Into<String>) -> Self {
        self.generation = Some(generation.into());
        self
    }

    /// Set the needs-supplement flag.
    #[must_use]
    pub fn with_needs_supplement(mut self, needs_supplement: bool) -> Self {
        self.needs_supplement = Some(needs_supplement);
        self
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur when using NodeContext methods.
#[derive(Debug, Error, Diagnostic)]
pub enum NodeContextError {
    /// Event could not be sent because the bus receiver is gone.
    #[error("failed to emit event: event bus unavailable")]
    #[diagnostic(
        code(draftsmith::node::event_bus_unavailable),
        help("The event bus may have been dropped or shut down before the node finished.")
    )]
    EventBusUnavailable,
}

/// Fatal errors raised while a node or decision executes.
#[derive(Debug, Error, Diagnostic)]
pub enum NodeError {
    /// Expected input data is missing from the state snapshot.
    #[error("missing expected input: {what}")]
    #[diagnostic(
        code(draftsmith::node::missing_input),
        help("Check that the upstream node produced the required data.")
    )]
    MissingInput { what: &'static str },

    /// An external collaborator (oracle, evidence store, search) failed.
    #[error("provider error ({provider}): {message}")]
    #[diagnostic(code(draftsmith::node::provider))]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// The oracle replied, but its verdict could not be understood.
    #[error("malformed verdict: {0}")]
    #[diagnostic(
        code(draftsmith::node::malformed_verdict),
        help("Verdict replies are validated strictly; an unreadable verdict is never defaulted.")
    )]
    MalformedVerdict(#[from] VerdictError),

    /// Event bus communication error.
    #[error("event bus error: {0}")]
    #[diagnostic(code(draftsmith::node::event_bus))]
    EventBus(#[from] NodeContextError),
}
