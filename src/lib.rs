//! # Draftsmith: Self-Correcting Email Answering Workflow
//!
//! Draftsmith reads a support question out of a mailbox, answers it from a
//! document corpus with web search as a fallback, checks its own answer, and
//! files the result as a draft reply. The answering pipeline is a small
//! graph of stations executed strictly one at a time, with every branch
//! decided by an LLM verdict parsed strictly (an off-script verdict fails
//! the run instead of silently picking a default).
//!
//! ## Core Concepts
//!
//! - **Stations**: Async units of work ([`node::Node`]) that read a state
//!   snapshot and return a partial update
//! - **Decisions**: Async branch points ([`graph::Decision`]) that pick the
//!   next station, usually by consulting the oracle
//! - **State**: Versioned channels ([`state::WorkflowState`]) so the engine
//!   can tell fresh evidence from stale
//! - **Verdicts**: Closed enums ([`verdict`]) parsed from single-key JSON
//!   oracle replies
//! - **Event bus**: Progress reporting decoupled from execution
//!   ([`event_bus`])
//!
//! ## Quick Start
//!
//! ### Wiring a Graph
//!
//! Stations are registered against [`types::NodeKind`] and connected with
//! unconditional edges or decisions; [`graph::GraphBuilder::compile`]
//! validates the wiring before anything runs:
//!
//! ```
//! use draftsmith::graph::GraphBuilder;
//! use draftsmith::node::{Node, NodeContext, NodePartial};
//! use draftsmith::state::StateSnapshot;
//! use draftsmith::types::NodeKind;
//! use async_trait::async_trait;
//!
//! struct DraftNode;
//!
//! #[async_trait]
//! impl Node for DraftNode {
//!     async fn run(
//!         &self,
//!         snapshot: StateSnapshot,
//!         _ctx: NodeContext,
//!     ) -> Result<NodePartial, draftsmith::node::NodeError> {
//!         let answer = format!("You asked: {}", snapshot.question);
//!         Ok(NodePartial::new().with_generation(answer))
//!     }
//! }
//!
//! let app = GraphBuilder::new()
//!     .add_node(NodeKind::Generate, DraftNode)
//!     .add_edge(NodeKind::Start, NodeKind::Generate)
//!     .add_edge(NodeKind::Generate, NodeKind::End)
//!     .compile()?;
//! # Ok::<(), draftsmith::graph::GraphError>(())
//! ```
//!
//! The production wiring lives in [`workflow::build`]; the binary drives it
//! via [`workflow::from_settings`] and [`app::App::invoke`].
//!
//! ### Strict Verdicts
//!
//! Oracle replies are instructions to the engine, so they are parsed, not
//! pattern-matched leniently:
//!
//! ```
//! use draftsmith::verdict::{RelevanceVerdict, RouteVerdict};
//!
//! let route = RouteVerdict::parse(r#"{"datasource": "vectorstore"}"#)?;
//! assert_eq!(route, RouteVerdict::Vectorstore);
//!
//! // Anything off-script is an error, never a silent default.
//! assert!(RelevanceVerdict::parse(r#"{"score": "maybe"}"#).is_err());
//! # Ok::<(), draftsmith::verdict::VerdictError>(())
//! ```
//!
//! ## Module Guide
//!
//! - [`types`] - Station identifiers
//! - [`state`] - Versioned run state and snapshots
//! - [`evidence`] - Passages and the evidence reducer
//! - [`node`] - Station trait and execution primitives
//! - [`graph`] - Workflow definition, validation, and compilation
//! - [`app`] - The sequential engine and its loop caps
//! - [`nodes`] / [`decisions`] - The answering pipeline's stations and
//!   branch points
//! - [`llm`], [`retrieval`], [`search`], [`mail`] - Collaborator clients
//! - [`verdict`] - Strict verdict parsing
//! - [`event_bus`] - Progress events and sinks
//! - [`config`] / [`workflow`] - Settings and standard assembly

pub mod app;
pub mod config;
pub mod decisions;
pub mod event_bus;
pub mod evidence;
pub mod graph;
pub mod llm;
pub mod mail;
pub mod node;
pub mod nodes;
pub mod retrieval;
pub mod search;
pub mod state;
pub mod types;
pub mod verdict;
pub mod workflow;
