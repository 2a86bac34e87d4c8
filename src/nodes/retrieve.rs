use std::sync::Arc;

use async_trait::async_trait;

use crate::evidence::EvidenceUpdate;
use crate::node::{Node, NodeContext, NodeError, NodePartial};
use crate::retrieval::EvidenceStore;
use crate::state::StateSnapshot;

/// Seeds the evidence channel from the curated store.
///
/// Always replaces: a run reaches this node at most once, at the top, and
/// starts from whatever the store currently holds.
pub struct RetrieveNode {
    store: Arc<dyn EvidenceStore>,
}

impl RetrieveNode {
    pub fn new(store: Arc<dyn EvidenceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Node for RetrieveNode {
    async fn run(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        ctx.emit("retrieve", "querying evidence store")?;
        let passages = self
            .store
            .retrieve(&snapshot.question)
            .await
            .map_err(|e| NodeError::Provider {
                provider: "evidence-store",
                message: e.to_string(),
            })?;
        ctx.emit("retrieve", format!("retrieved {} passage(s)", passages.len()))?;
        Ok(NodePartial::new().with_evidence(EvidenceUpdate::Replace(passages)))
    }
}
