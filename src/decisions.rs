//! The three branch points of the answering workflow.
//!
//! Each implements [`Decision`] and is attached to a source station by the
//! standard wiring: routing at the entry, the supplement check after
//! grading, and verification after generation. Verification is where the
//! self-correction lives: an unsupported answer regenerates over the same
//! evidence, a supported-but-off-target answer goes back out for more.

use async_trait::async_trait;

use crate::evidence::render_context;
use crate::graph::Decision;
use crate::llm::{GroundingGrader, QuestionRouter, ResolutionGrader};
use crate::node::{NodeContext, NodeError};
use crate::state::StateSnapshot;
use crate::types::NodeKind;
use crate::verdict::RouteVerdict;

/// Entry routing: corpus questions retrieve locally, everything else goes
/// straight to web search.
pub struct RouteDecision {
    router: QuestionRouter,
}

impl RouteDecision {
    pub fn new(router: QuestionRouter) -> Self {
        Self { router }
    }
}

#[async_trait]
impl Decision for RouteDecision {
    async fn decide(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodeKind, NodeError> {
        let verdict = self.router.route(&snapshot.question).await?;
        ctx.emit("route", format!("routing question to {verdict}"))?;
        Ok(match verdict {
            RouteVerdict::WebSearch => NodeKind::WebSearch,
            RouteVerdict::Vectorstore => NodeKind::Retrieve,
        })
    }
}

/// Post-grading check of the needs-supplement flag.
pub struct SupplementDecision;

#[async_trait]
impl Decision for SupplementDecision {
    async fn decide(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodeKind, NodeError> {
        if snapshot.needs_supplement {
            ctx.emit("supplement", "local evidence insufficient, searching the web")?;
            Ok(NodeKind::WebSearch)
        } else {
            ctx.emit("supplement", "local evidence sufficient, drafting")?;
            Ok(NodeKind::Generate)
        }
    }
}

/// Post-generation verification: grounding first, then resolution.
///
/// Grounding is judged against the same rendered context the draft was
/// generated from. Resolution only runs once grounding passes; there is no
/// point asking whether a hallucinated answer resolves the question.
pub struct VerifyDecision {
    grounding: GroundingGrader,
    resolution: ResolutionGrader,
}

impl VerifyDecision {
    pub fn new(grounding: GroundingGrader, resolution: ResolutionGrader) -> Self {
        Self {
            grounding,
            resolution,
        }
    }
}

#[async_trait]
impl Decision for VerifyDecision {
    async fn decide(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodeKind, NodeError> {
        let generation = snapshot.generation.as_deref().ok_or(NodeError::MissingInput {
            what: "candidate answer",
        })?;
        let evidence = render_context(&snapshot.evidence);

        let grounding = self.grounding.check(&evidence, generation).await?;
        ctx.emit("verify", format!("grounding: {grounding}"))?;
        if !grounding.is_grounded() {
            ctx.emit("verify", "regenerating over the same evidence")?;
            return Ok(NodeKind::Generate);
        }

        let resolution = self.resolution.check(&snapshot.question, generation).await?;
        ctx.emit("verify", format!("resolution: {resolution}"))?;
        if resolution.resolves() {
            Ok(NodeKind::End)
        } else {
            ctx.emit("verify", "expanding evidence before regenerating")?;
            Ok(NodeKind::WebSearch)
        }
    }
}
