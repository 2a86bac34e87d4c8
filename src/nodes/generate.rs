use async_trait::async_trait;

use crate::llm::AnswerGenerator;
use crate::node::{Node, NodeContext, NodeError, NodePartial};
use crate::state::StateSnapshot;

/// Drafts a candidate answer from the accumulated evidence.
///
/// Upstream nodes guarantee the evidence set is non-empty by the time this
/// runs; an empty set here means the graph was miswired, so it is reported
/// as a missing input rather than papered over with an evidence-free prompt.
pub struct GenerateNode {
    generator: AnswerGenerator,
}

impl GenerateNode {
    pub fn new(generator: AnswerGenerator) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Node for GenerateNode {
    async fn run(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        if snapshot.evidence.is_empty() {
            return Err(NodeError::MissingInput {
                what: "evidence passages",
            });
        }

        ctx.emit(
            "generate",
            format!("drafting from {} passage(s)", snapshot.evidence.len()),
        )?;

        let context = crate::evidence::render_context(&snapshot.evidence);
        let answer = self.generator.generate(&snapshot.question, &context).await?;

        ctx.emit("generate", "drafted candidate answer")?;
        Ok(NodePartial::new().with_generation(answer))
    }
}
