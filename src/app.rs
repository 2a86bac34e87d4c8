//! The compiled, executable workflow.
//!
//! [`App`] owns the node registry, the routing table, and the loop caps.
//! Execution is strictly sequential: evaluate the current station's route,
//! run the chosen node against a fresh snapshot, merge its partial update,
//! repeat until a route yields the virtual end. The engine is the only code
//! that constructs or mutates [`WorkflowState`]; nodes see snapshots and
//! return partials.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::config::RunLimits;
use crate::event_bus::{Event, EventBus, EventSink};
use crate::graph::Decision;
use crate::node::{Node, NodeContext, NodeError, NodePartial};
use crate::state::WorkflowState;
use crate::types::NodeKind;

/// Result of a completed run.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    /// The answer that survived verification.
    pub answer: String,
    /// Number of node executions (virtual endpoints excluded).
    pub steps: u32,
    /// Number of times the generate station ran.
    pub generations: u32,
}

/// Ways a run can fail.
///
/// The loop-cap variants are reported failures, not crashes: they mean the
/// run was healthy but could not converge on a satisfactory answer within
/// its budget.
#[derive(Debug, Error, Diagnostic)]
pub enum WorkflowError {
    /// A node or decision failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Node(#[from] NodeError),

    /// Execution reached a station with no route out.
    #[error("no route out of `{kind}`")]
    #[diagnostic(
        code(draftsmith::workflow::no_route),
        help("Compile-time validation should have caught this; was the App assembled by hand?")
    )]
    NoRouteFrom { kind: NodeKind },

    /// A decision routed to a station that was never registered.
    #[error("decision routed to unregistered node `{kind}`")]
    #[diagnostic(code(draftsmith::workflow::unknown_node))]
    UnknownNode { kind: NodeKind },

    /// The generate station ran its full budget without a verified answer.
    #[error("could not produce a satisfactory answer after {attempts} generation attempts")]
    #[diagnostic(
        code(draftsmith::workflow::exhausted_generations),
        help("Raise RunLimits::max_generations or inspect the verifier verdicts.")
    )]
    ExhaustedGenerations { attempts: u32 },

    /// Regeneration kept failing grounding without any new evidence arriving.
    #[error("answer failed grounding after {regenerations} regeneration(s) over unchanged evidence")]
    #[diagnostic(code(draftsmith::workflow::stalled))]
    StalledWithoutNewEvidence { regenerations: u32 },

    /// Global safety valve against wiring bugs that cycle forever.
    #[error("run exceeded the step budget of {steps} steps")]
    #[diagnostic(code(draftsmith::workflow::step_budget))]
    StepBudgetExhausted { steps: u32 },

    /// The run reached the end without a drafted answer. Indicates a broken
    /// graph; the standard wiring cannot produce it.
    #[error("workflow terminated without producing an answer")]
    #[diagnostic(code(draftsmith::workflow::missing_answer))]
    MissingAnswer,
}

/// Orchestrates graph execution and merges node updates between steps.
#[derive(Clone)]
pub struct App {
    nodes: FxHashMap<NodeKind, Arc<dyn Node>>,
    edges: FxHashMap<NodeKind, NodeKind>,
    decisions: FxHashMap<NodeKind, Arc<dyn Decision>>,
    limits: RunLimits,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("edges", &self.edges)
            .field("decisions", &self.decisions.keys().collect::<Vec<_>>())
            .field("limits", &self.limits)
            .finish()
    }
}

impl App {
    /// Internal (crate) factory to build an App while keeping nodes/edges
    /// private. Callers go through `GraphBuilder::compile`, which validates.
    pub(crate) fn from_parts(
        nodes: FxHashMap<NodeKind, Arc<dyn Node>>,
        edges: FxHashMap<NodeKind, NodeKind>,
        decisions: FxHashMap<NodeKind, Arc<dyn Decision>>,
        limits: RunLimits,
    ) -> Self {
        App {
            nodes,
            edges,
            decisions,
            limits,
        }
    }

    /// Returns a reference to the node registry.
    #[must_use]
    pub fn nodes(&self) -> &FxHashMap<NodeKind, Arc<dyn Node>> {
        &self.nodes
    }

    /// Returns a reference to the unconditional routing table.
    #[must_use]
    pub fn edges(&self) -> &FxHashMap<NodeKind, NodeKind> {
        &self.edges
    }

    /// Returns the loop caps this app runs under.
    #[must_use]
    pub fn limits(&self) -> &RunLimits {
        &self.limits
    }

    /// Execute a run over `question` with the default stdout event sink.
    #[instrument(skip(self, question), fields(run_id = %Uuid::new_v4()), err)]
    pub async fn invoke(&self, question: impl Into<String>) -> Result<RunOutcome, WorkflowError> {
        self.invoke_with_bus(question.into(), EventBus::default())
            .await
    }

    /// Execute a run, streaming events to the provided sinks instead of
    /// stdout. Useful for tests and embedding.
    #[instrument(skip(self, question, sinks), fields(run_id = %Uuid::new_v4()), err)]
    pub async fn invoke_with_sinks(
        &self,
        question: impl Into<String>,
        sinks: Vec<Box<dyn EventSink>>,
    ) -> Result<RunOutcome, WorkflowError> {
        self.invoke_with_bus(question.into(), EventBus::with_sinks(sinks))
            .await
    }

    async fn invoke_with_bus(
        &self,
        question: String,
        bus: EventBus,
    ) -> Result<RunOutcome, WorkflowError> {
        bus.listen_for_events();
        let result = self.run(question, &bus).await;
        bus.stop_listener().await;
        result
    }

    async fn run(&self, question: String, bus: &EventBus) -> Result<RunOutcome, WorkflowError> {
        let sender = bus.get_sender();
        let mut state = WorkflowState::new(question);
        let mut current = NodeKind::Start;
        let mut steps: u32 = 0;
        let mut generations: u32 = 0;
        let mut stale_regenerations: u32 = 0;
        let mut evidence_at_last_generate: Option<u32> = None;

        let _ = sender.send(Event::diagnostic("engine", "run started"));

        loop {
            let next = self.next_station(current, &state, bus, steps).await?;
            if next.is_end() {
                let _ = sender.send(Event::diagnostic(
                    "engine",
                    format!("run complete after {steps} step(s)"),
                ));
                break;
            }

            steps += 1;
            if steps > self.limits.max_steps {
                return Err(WorkflowError::StepBudgetExhausted {
                    steps: self.limits.max_steps,
                });
            }

            if next == NodeKind::Generate {
                generations += 1;
                if generations > self.limits.max_generations {
                    return Err(WorkflowError::ExhaustedGenerations {
                        attempts: self.limits.max_generations,
                    });
                }
                // Unchanged evidence version means this is a pure
                // regeneration; those get their own, tighter budget.
                let version = state.evidence.version();
                if evidence_at_last_generate == Some(version) {
                    stale_regenerations += 1;
                    if stale_regenerations > self.limits.max_stale_regenerations {
                        return Err(WorkflowError::StalledWithoutNewEvidence {
                            regenerations: self.limits.max_stale_regenerations,
                        });
                    }
                } else {
                    stale_regenerations = 0;
                }
                evidence_at_last_generate = Some(version);
            }

            let node = self
                .nodes
                .get(&next)
                .ok_or(WorkflowError::UnknownNode { kind: next })?;
            let ctx = NodeContext {
                node_id: next.to_string(),
                step: u64::from(steps),
                event_bus_sender: bus.get_sender(),
            };
            let partial = node.run(state.snapshot(), ctx).await?;
            let updated = self.apply_update(&mut state, next, partial);
            tracing::debug!(node = %next, channels = ?updated, "merged node update");

            current = next;
        }

        let answer = state
            .generation
            .get()
            .clone()
            .ok_or(WorkflowError::MissingAnswer)?;
        Ok(RunOutcome {
            answer,
            steps,
            generations,
        })
    }

    /// Picks the next station out of `current`: its decision if one is
    /// attached, otherwise its unconditional edge.
    async fn next_station(
        &self,
        current: NodeKind,
        state: &WorkflowState,
        bus: &EventBus,
        steps: u32,
    ) -> Result<NodeKind, WorkflowError> {
        if let Some(decision) = self.decisions.get(&current) {
            let ctx = NodeContext {
                node_id: current.to_string(),
                step: u64::from(steps),
                event_bus_sender: bus.get_sender(),
            };
            return Ok(decision.decide(state.snapshot(), ctx).await?);
        }
        self.edges
            .get(&current)
            .copied()
            .ok_or(WorkflowError::NoRouteFrom { kind: current })
    }

    /// Merges a node's partial update into the state, bumping a channel's
    /// version only when its content actually changed.
    fn apply_update(
        &self,
        state: &mut WorkflowState,
        node: NodeKind,
        partial: NodePartial,
    ) -> Vec<&'static str> {
        let mut updated: Vec<&'static str> = Vec::new();

        if let Some(update) = partial.evidence {
            let before = state.evidence.get().clone();
            let before_version = state.evidence.version();
            update.apply(state.evidence.get_mut());
            if *state.evidence.get() != before {
                state.evidence.bump();
                tracing::info!(
                    target: "draftsmith::app",
                    node = %node,
                    channel = "evidence",
                    before_count = before.len(),
                    after_count = state.evidence.get().len(),
                    before_version,
                    after_version = state.evidence.version(),
                    "channel updated"
                );
                updated.push("evidence");
            }
        }

        if let Some(generation) = partial.generation {
            if state.generation.get().as_deref() != Some(generation.as_str()) {
                let before_version = state.generation.version();
                *state.generation.get_mut() = Some(generation);
                state.generation.bump();
                tracing::info!(
                    target: "draftsmith::app",
                    node = %node,
                    channel = "generation",
                    before_version,
                    after_version = state.generation.version(),
                    "channel updated"
                );
                updated.push("generation");
            }
        }

        if let Some(flag) = partial.needs_supplement {
            if *state.needs_supplement.get() != flag {
                let before_version = state.needs_supplement.version();
                *state.needs_supplement.get_mut() = flag;
                state.needs_supplement.bump();
                tracing::info!(
                    target: "draftsmith::app",
                    node = %node,
                    channel = "needs_supplement",
                    value = flag,
                    before_version,
                    after_version = state.needs_supplement.version(),
                    "channel updated"
                );
                updated.push("needs_supplement");
            }
        }

        updated
    }
}
