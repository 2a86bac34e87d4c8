use async_trait::async_trait;
use futures_util::future::join_all;

use crate::evidence::EvidenceUpdate;
use crate::llm::RelevanceGrader;
use crate::node::{Node, NodeContext, NodeError, NodePartial};
use crate::state::StateSnapshot;
use crate::verdict::RelevanceVerdict;

/// Filters the evidence down to passages the grader accepts.
///
/// Grading calls are independent reads, so they run concurrently; the
/// verdicts are merged back in input order and survivors keep their
/// relative positions. The needs-supplement flag goes up if any passage
/// was rejected, and also when nothing survives (including the case where
/// retrieval found nothing to grade): either way the local evidence alone
/// is not trusted to carry the answer.
pub struct GradeDocsNode {
    grader: RelevanceGrader,
}

impl GradeDocsNode {
    pub fn new(grader: RelevanceGrader) -> Self {
        Self { grader }
    }
}

#[async_trait]
impl Node for GradeDocsNode {
    async fn run(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        let StateSnapshot {
            question, evidence, ..
        } = snapshot;

        ctx.emit("grade_docs", format!("grading {} passage(s)", evidence.len()))?;

        let verdicts = join_all(
            evidence
                .iter()
                .map(|passage| self.grader.grade(&question, &passage.content)),
        )
        .await;

        let total = evidence.len();
        let mut kept = Vec::with_capacity(total);
        let mut rejected = 0usize;
        for (index, (passage, verdict)) in evidence.into_iter().zip(verdicts).enumerate() {
            let verdict = verdict?;
            ctx.emit("grade_docs", format!("passage {index}: {verdict}"))?;
            match verdict {
                RelevanceVerdict::Relevant => kept.push(passage),
                RelevanceVerdict::Irrelevant => rejected += 1,
            }
        }

        let needs_supplement = rejected > 0 || kept.is_empty();
        ctx.emit(
            "grade_docs",
            format!(
                "kept {} of {total} passage(s); supplement {}",
                kept.len(),
                if needs_supplement {
                    "needed"
                } else {
                    "not needed"
                }
            ),
        )?;

        Ok(NodePartial::new()
            .with_evidence(EvidenceUpdate::Replace(kept))
            .with_needs_supplement(needs_supplement))
    }
}
